//! Capture configuration parameters
//!
//! Per-instance setup for one capture engine: which raw timer channels carry
//! the rising and falling edges, how long one counter tick lasts, and how
//! wide the free-running counter is.  Fixed for the life of an engine.

use serde::{Deserialize, Serialize};

use crate::drivers::stm32::{TIM_CHANNEL_1, TIM_CHANNEL_2};
use crate::error::ConfigError;

/// Core capture configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    // --- Channels ---
    /// Raw selector of the channel latching rising edges
    pub rise_channel: u32,
    /// Raw selector of the channel latching falling edges
    pub fall_channel: u32,

    // --- Timebase ---
    /// Seconds per counter tick
    pub tick_duration_secs: f64,
    /// Width of the free-running counter in bits (1-32)
    pub counter_bits: u8,
}

impl CaptureConfig {
    pub fn new(rise_channel: u32, fall_channel: u32, tick_duration_secs: f64) -> Self {
        Self {
            rise_channel,
            fall_channel,
            tick_duration_secs,
            ..Self::default()
        }
    }

    /// Override the counter width (16-bit timers wrap far sooner).
    pub fn with_counter_bits(mut self, bits: u8) -> Self {
        self.counter_bits = bits;
        self
    }

    /// Range-check every field.  Channel selectors are checked later by the
    /// channel driver, which is the only party that knows the mapping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_duration_secs.is_finite() || self.tick_duration_secs <= 0.0 {
            return Err(ConfigError::InvalidTickDuration);
        }
        if !(1..=32).contains(&self.counter_bits) {
            return Err(ConfigError::InvalidCounterWidth(self.counter_bits));
        }
        Ok(())
    }

    /// Mask selecting the live bits of the counter.
    pub(crate) fn counter_mask(&self) -> u32 {
        u32::MAX >> (32 - u32::from(self.counter_bits.clamp(1, 32)))
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            rise_channel: TIM_CHANNEL_1,
            fall_channel: TIM_CHANNEL_2,
            tick_duration_secs: 1e-6, // 1 MHz timer clock
            counter_bits: 32,
        }
    }
}

/// How the rise/fall captures relate to one signal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// Counter resets on every rising edge (PWM-input slave mode): the rise
    /// capture is the period, the fall capture is the high time.
    DirectEdgePair,
    /// Free-running counter: two consecutive rises bracket one period, a fall
    /// between them ends the pulse.  Duty is taken against `full_scale_ticks`,
    /// normally the timer's auto-reload count.
    BracketedCycle { full_scale_ticks: u32 },
}

impl CaptureMode {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::DirectEdgePair => Ok(()),
            Self::BracketedCycle { full_scale_ticks: 0 } => Err(ConfigError::InvalidFullScale),
            Self::BracketedCycle { .. } => Ok(()),
        }
    }
}
