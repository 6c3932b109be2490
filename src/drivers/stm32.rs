//! STM32 HAL channel selectors and their active-channel tags.
//!
//! Capture is configured with `TIM_CHANNEL_x` selectors, but the capture
//! interrupt reports which channel fired through `HAL_TIM_ActiveChannel`.
//! The two encodings differ, so every selector has to be translated once at
//! init before edge events can be matched against it.

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

pub const TIM_CHANNEL_1: u32 = 0x0000_0000;
pub const TIM_CHANNEL_2: u32 = 0x0000_0004;
pub const TIM_CHANNEL_3: u32 = 0x0000_0008;
pub const TIM_CHANNEL_4: u32 = 0x0000_000C;
pub const TIM_CHANNEL_ALL: u32 = 0x0000_003C;

/// Channel tag carried by a capture interrupt (`htim->Channel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActiveChannel {
    /// No specific channel; what `TIM_CHANNEL_ALL` resolves to.
    Cleared = 0x00,
    Ch1 = 0x01,
    Ch2 = 0x02,
    Ch3 = 0x04,
    Ch4 = 0x08,
}

impl ActiveChannel {
    /// Raw register encoding.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Translate a `TIM_CHANNEL_x` selector into the interrupt's channel tag.
pub fn map_tim_channel(raw: u32) -> Result<ActiveChannel, ChannelError> {
    match raw {
        TIM_CHANNEL_1 => Ok(ActiveChannel::Ch1),
        TIM_CHANNEL_2 => Ok(ActiveChannel::Ch2),
        TIM_CHANNEL_3 => Ok(ActiveChannel::Ch3),
        TIM_CHANNEL_4 => Ok(ActiveChannel::Ch4),
        TIM_CHANNEL_ALL => Ok(ActiveChannel::Cleared),
        other => Err(ChannelError::Unmapped(other)),
    }
}
