//! In-memory channel driver for host builds and tests.
//!
//! Resolves selectors with the STM32 map and tracks which channels are
//! armed, without touching any peripheral.  Edge events are injected by
//! calling the engine directly.
//!
//! ## Dual-target design
//!
//! On target: a board adapter implements [`ChannelDriver`] over the real
//! timer and forwards its capture interrupt.
//! On host/test: this driver stands in and records state in-memory only.

use log::debug;

use crate::drivers::stm32::{map_tim_channel, ActiveChannel};
use crate::error::ChannelError;
use crate::ports::ChannelDriver;

/// Mask covering every channel; `Cleared` arms them all.
const ALL_CHANNELS: u8 = 0x0F;

#[derive(Debug, Default)]
pub struct SimChannelDriver {
    armed: u8,
    start_calls: u32,
    stop_calls: u32,
    fail_next_start: bool,
}

impl SimChannelDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start_channel_capture` fail once.
    pub fn fail_next_start(&mut self) {
        self.fail_next_start = true;
    }

    pub fn is_armed(&self, channel: ActiveChannel) -> bool {
        self.armed & Self::mask(channel) != 0
    }

    /// True if no channel is delivering edges.
    pub fn all_disarmed(&self) -> bool {
        self.armed == 0
    }

    pub fn start_calls(&self) -> u32 {
        self.start_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }

    fn mask(channel: ActiveChannel) -> u8 {
        match channel {
            ActiveChannel::Cleared => ALL_CHANNELS,
            ch => ch.bits(),
        }
    }
}

impl ChannelDriver for SimChannelDriver {
    type Channel = ActiveChannel;

    fn map_channel(&self, raw: u32) -> Result<ActiveChannel, ChannelError> {
        map_tim_channel(raw)
    }

    fn is_capture_channel(&self, channel: ActiveChannel) -> bool {
        channel != ActiveChannel::Cleared
    }

    fn start_channel_capture(&mut self, channel: ActiveChannel) -> Result<(), ChannelError> {
        self.start_calls = self.start_calls.saturating_add(1);
        if core::mem::take(&mut self.fail_next_start) {
            debug!("capture(sim): arm {:?} refused", channel);
            return Err(ChannelError::StartFailed);
        }
        self.armed |= Self::mask(channel);
        debug!("capture(sim): armed {:?}", channel);
        Ok(())
    }

    fn stop_channel_capture(&mut self, channel: ActiveChannel) -> Result<(), ChannelError> {
        self.stop_calls = self.stop_calls.saturating_add(1);
        self.armed &= !Self::mask(channel);
        debug!("capture(sim): disarmed {:?}", channel);
        Ok(())
    }
}
