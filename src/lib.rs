//! PWM input-capture library.
//!
//! Measures period, frequency, duty cycle and pulse width of a PWM signal
//! from rise/fall edge captures on two timer channels.  The timer itself
//! stays behind the [`ports::ChannelDriver`] trait; this crate only
//! consumes "edge on channel X at counter value V" events.
//!
//! `no_std`: the edge handler runs in interrupt context on bare metal.

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod capture;
pub mod config;
pub mod drivers;
pub mod error;
pub mod ports;

pub use capture::{CaptureEngine, CaptureResult, CaptureSlot, CaptureStats, Sequence};
pub use config::{CaptureConfig, CaptureMode};
pub use error::{ChannelError, ConfigError, Error, Result};
