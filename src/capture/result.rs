//! Measurement maths: raw tick counts → period, frequency, duty, pulse width.
//!
//! Everything here is pure and allocation-free so it can run inline in the
//! capture interrupt.  A zero-tick period yields `None`; callers must never
//! publish an infinite or NaN frequency.

use serde::{Deserialize, Serialize};

/// Result of one completed capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptureResult {
    /// Signal period (seconds).
    pub period_secs: f64,
    /// Signal frequency (Hz).
    pub frequency_hz: f64,
    /// High time as a share of the reference span (0-100 %).
    pub duty_percent: f64,
    /// High time in counter ticks.
    pub pulse_width_ticks: u32,
}

impl CaptureResult {
    /// All-zero result reported before the first completed cycle.
    pub const ZERO: Self = Self {
        period_secs: 0.0,
        frequency_hz: 0.0,
        duty_percent: 0.0,
        pulse_width_ticks: 0,
    };

    /// Direct edge pair: the rise capture *is* the period, the fall capture
    /// *is* the high time.
    pub fn from_direct(rise_ticks: u32, fall_ticks: u32, tick_secs: f64) -> Option<Self> {
        Self::build(rise_ticks, fall_ticks, rise_ticks, tick_secs)
    }

    /// Bracketed cycle: period measured between two rises, duty taken
    /// against a fixed full-scale reference.
    pub fn from_bracketed(
        period_ticks: u32,
        pulse_ticks: u32,
        full_scale_ticks: u32,
        tick_secs: f64,
    ) -> Option<Self> {
        Self::build(period_ticks, pulse_ticks, full_scale_ticks, tick_secs)
    }

    /// Frequency rounded to the nearest whole hertz.
    pub fn frequency_hz_whole(&self) -> u32 {
        // The reciprocal often lands a hair below the exact integer, so
        // truncating would read 1 Hz low.  `as` saturates, so an absurd
        // frequency cannot wrap.
        (self.frequency_hz + 0.5) as u32
    }

    fn build(period_ticks: u32, pulse_ticks: u32, duty_ref_ticks: u32, tick_secs: f64) -> Option<Self> {
        if period_ticks == 0 || duty_ref_ticks == 0 {
            return None;
        }
        let period_secs = f64::from(period_ticks) * tick_secs;
        if !(period_secs > 0.0 && period_secs.is_finite()) {
            return None;
        }
        Some(Self {
            period_secs,
            frequency_hz: 1.0 / period_secs,
            duty_percent: duty_percent(pulse_ticks, duty_ref_ticks),
            pulse_width_ticks: pulse_ticks,
        })
    }
}

/// `part / whole` as a percentage, clamped to 0..=100.
fn duty_percent(part: u32, whole: u32) -> f64 {
    (f64::from(part) / f64::from(whole) * 100.0).clamp(0.0, 100.0)
}

/// Ticks elapsed from `from` to `to` on a counter that wraps at `mask + 1`.
pub(crate) fn ticks_between(from: u32, to: u32, mask: u32) -> u32 {
    to.wrapping_sub(from) & mask
}
