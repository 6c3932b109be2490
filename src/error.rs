//! Unified error types for the capture engine.
//!
//! A single `Error` enum that every lifecycle call returns, so the owner of
//! an engine handles failures uniformly.  All variants are `Copy` so they
//! can be passed around from interrupt-adjacent code without allocation.
//!
//! The edge-event handler never returns an error: anything it cannot use is
//! dropped on the floor.  Only lifecycle calls report through this type.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level capture error
// ---------------------------------------------------------------------------

/// Every fallible lifecycle operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configuration handed to `init` is unusable.
    Config(ConfigError),
    /// A lifecycle call reached a slot that holds no engine.
    NotInitialized,
    /// The call is not valid in the current state (e.g. `init` twice).
    InvalidState,
    /// The channel driver refused to arm or disarm a channel.
    Channel(ChannelError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::NotInitialized => write!(f, "capture not initialised"),
            Self::InvalidState => write!(f, "invalid state for this call"),
            Self::Channel(e) => write!(f, "channel: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The channel-mapping collaborator does not recognise this selector.
    UnmappedChannel(u32),
    /// Rise and fall resolved to the same hardware channel.
    DuplicateChannel,
    /// Selector maps to an aggregate tag that never reports an edge.
    AggregateChannel(u32),
    /// Tick duration is zero, negative, or not finite.
    InvalidTickDuration,
    /// Counter width outside 1..=32 bits.
    InvalidCounterWidth(u8),
    /// Bracketed-cycle full-scale reference is zero.
    InvalidFullScale,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedChannel(raw) => write!(f, "channel 0x{raw:02X} not mapped"),
            Self::DuplicateChannel => write!(f, "rise and fall share one channel"),
            Self::AggregateChannel(raw) => write!(f, "channel 0x{raw:02X} is not a single input"),
            Self::InvalidTickDuration => write!(f, "tick duration must be finite and > 0"),
            Self::InvalidCounterWidth(bits) => write!(f, "counter width {bits} not in 1..=32"),
            Self::InvalidFullScale => write!(f, "full-scale reference must be > 0"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Channel driver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// Raw selector has no hardware counterpart.
    Unmapped(u32),
    /// The driver could not enable capture interrupts.
    StartFailed,
    /// The driver could not disable capture interrupts.
    StopFailed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmapped(raw) => write!(f, "selector 0x{raw:02X} unmapped"),
            Self::StartFailed => write!(f, "capture start failed"),
            Self::StopFailed => write!(f, "capture stop failed"),
        }
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        match e {
            // An unmapped selector can only come out of channel mapping,
            // which is a configuration problem from the caller's side.
            ChannelError::Unmapped(raw) => Self::Config(ConfigError::UnmappedChannel(raw)),
            other => Self::Channel(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
