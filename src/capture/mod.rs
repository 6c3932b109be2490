//! Timer input-capture engine.
//!
//! Turns "edge on channel X at counter value V" events into period,
//! frequency, duty-cycle and pulse-width measurements.
//!
//! ```text
//!  capture ISR ──▶ on_edge_event ──▶ ┌──────────────────────┐
//!                                     │ AwaitingRise          │
//!                                     │   │ rise              │
//!                                     │   ▼                   │
//!                                     │ AwaitingSecondRiseOr- │
//!                                     │ Fall ── cycle done ──▶│──▶ CaptureResult
//!                                     └──────────────────────┘     (latched)
//!  main loop ──▶ take_result / frequency / duty ...
//! ```
//!
//! ## Interrupt contract
//!
//! [`CaptureEngine::on_edge_event`] runs in the capture interrupt.  It never
//! loops, allocates, blocks, or logs, and it never fails: events on a foreign
//! channel or arriving while stopped are dropped.  Lifecycle calls take
//! `&mut self`, so the owner has to provide exclusion against the interrupt.
//! [`CaptureSlot`] does that with a critical section.

pub mod result;
pub mod slot;

use log::{debug, info, warn};

use crate::config::{CaptureConfig, CaptureMode};
use crate::error::{ConfigError, Error, Result};
use crate::ports::ChannelDriver;

pub use result::CaptureResult;
pub use slot::CaptureSlot;

use result::ticks_between;

// ---------------------------------------------------------------------------
// Sequence state
// ---------------------------------------------------------------------------

/// Which edges of the current cycle have been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Waiting for the rise that opens a cycle.
    AwaitingRise,
    /// Cycle opened; waiting for the fall (direct) or for the second rise
    /// and the fall in either order (bracketed).
    AwaitingSecondRiseOrFall,
    /// Every edge is in; only held while the result is being computed.
    Complete,
}

/// Raw counter snapshots for the cycle in progress.
#[derive(Debug, Clone, Copy, Default)]
struct RawTicks {
    first_rise: Option<u32>,
    second_rise: Option<u32>,
    fall: Option<u32>,
    /// Bracketed mode: the fall landed before the second rise.
    fall_before_second: bool,
}

/// Lifetime counters for diagnostics.  Both wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Cycles that produced a published result.
    pub cycles_completed: u32,
    /// Cycles discarded because the measured period was zero ticks.
    pub degenerate_cycles: u32,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One capture engine bound to one rise/fall channel pair.
pub struct CaptureEngine<D: ChannelDriver> {
    config: CaptureConfig,
    mode: CaptureMode,
    driver: D,
    rise: D::Channel,
    fall: D::Channel,

    running: bool,
    sequence: Sequence,
    raw: RawTicks,

    /// Latched result; only ever replaced whole.
    result: CaptureResult,
    result_ready: bool,
    stats: CaptureStats,
}

impl<D: ChannelDriver> CaptureEngine<D> {
    /// Validate the setup and resolve both channels through `driver`.
    ///
    /// The engine comes back stopped, with no result.  Call
    /// [`start`](Self::start) to arm the channels.
    pub fn new(config: CaptureConfig, mode: CaptureMode, driver: D) -> Result<Self> {
        config.validate()?;
        mode.validate()?;

        let rise = driver
            .map_channel(config.rise_channel)
            .map_err(|_| ConfigError::UnmappedChannel(config.rise_channel))?;
        let fall = driver
            .map_channel(config.fall_channel)
            .map_err(|_| ConfigError::UnmappedChannel(config.fall_channel))?;
        if !driver.is_capture_channel(rise) {
            return Err(ConfigError::AggregateChannel(config.rise_channel).into());
        }
        if !driver.is_capture_channel(fall) {
            return Err(ConfigError::AggregateChannel(config.fall_channel).into());
        }
        if rise == fall {
            return Err(ConfigError::DuplicateChannel.into());
        }

        info!("capture: init rise={:?} fall={:?} mode={:?}", rise, fall, mode);

        Ok(Self {
            config,
            mode,
            driver,
            rise,
            fall,
            running: false,
            sequence: Sequence::AwaitingRise,
            raw: RawTicks::default(),
            result: CaptureResult::ZERO,
            result_ready: false,
            stats: CaptureStats::default(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm both channels and start accepting edges.
    ///
    /// A partially captured cycle is kept: edges seen before a `stop` still
    /// count once capture resumes.  Use [`reset`](Self::reset) to discard it.
    pub fn start(&mut self) -> Result<()> {
        self.arm()?;
        self.running = true;
        info!("capture: started ({:?})", self.sequence);
        Ok(())
    }

    /// Disarm both channels, stop accepting edges and drop the ready flag.
    /// Safe to call repeatedly.
    pub fn stop(&mut self) -> Result<()> {
        self.running = false;
        self.result_ready = false;
        let disarmed = self.disarm();
        info!("capture: stopped ({:?})", self.sequence);
        disarmed
    }

    /// Discard all capture state and the latched result, then re-arm.
    ///
    /// Recovers from a stalled sequence, e.g. a cycle that lost an edge.
    pub fn reset(&mut self) -> Result<()> {
        self.running = false;
        let disarmed = self.disarm();

        self.sequence = Sequence::AwaitingRise;
        self.raw = RawTicks::default();
        self.result = CaptureResult::ZERO;
        self.result_ready = false;

        disarmed?;
        self.arm()?;
        self.running = true;
        info!("capture: reset");
        Ok(())
    }

    /// Disarm the channels and hand the driver back.
    pub fn release(mut self) -> D {
        self.running = false;
        if let Err(e) = self.disarm() {
            warn!("capture: release could not disarm channels: {e}");
        }
        info!("capture: released");
        self.driver
    }

    // ── Interrupt path ────────────────────────────────────────

    /// Feed one edge.  Called from the capture interrupt.
    pub fn on_edge_event(&mut self, channel: D::Channel, counter: u32) {
        if !self.running {
            return;
        }
        let counter = counter & self.config.counter_mask();

        if channel == self.rise {
            self.on_rise(counter);
        } else if channel == self.fall {
            self.on_fall(counter);
        } else {
            return;
        }

        if self.cycle_complete() {
            self.complete_cycle();
        }
    }

    fn on_rise(&mut self, counter: u32) {
        match (self.sequence, self.mode) {
            (Sequence::AwaitingRise, _) => {
                self.raw.first_rise = Some(counter);
                self.sequence = Sequence::AwaitingSecondRiseOrFall;
            }
            // The period register latches every cycle; keep the freshest.
            (Sequence::AwaitingSecondRiseOrFall, CaptureMode::DirectEdgePair) => {
                self.raw.first_rise = Some(counter);
            }
            (Sequence::AwaitingSecondRiseOrFall, CaptureMode::BracketedCycle { .. }) => {
                // Third rise without a fall: slide the bracket forward.
                if self.raw.second_rise.is_some() {
                    self.raw.first_rise = self.raw.second_rise;
                }
                self.raw.second_rise = Some(counter);
            }
            (Sequence::Complete, _) => {}
        }
    }

    fn on_fall(&mut self, counter: u32) {
        match self.mode {
            // Pulse capture precedes the period capture in PWM-input mode.
            CaptureMode::DirectEdgePair => {
                self.raw.fall = Some(counter);
            }
            CaptureMode::BracketedCycle { .. } => {
                // No opening rise yet, so nothing to measure the pulse from.
                if self.sequence == Sequence::AwaitingRise {
                    return;
                }
                self.raw.fall = Some(counter);
                self.raw.fall_before_second = self.raw.second_rise.is_none();
            }
        }
    }

    fn cycle_complete(&self) -> bool {
        let raw = &self.raw;
        match self.mode {
            CaptureMode::DirectEdgePair => raw.first_rise.is_some() && raw.fall.is_some(),
            CaptureMode::BracketedCycle { .. } => {
                raw.first_rise.is_some() && raw.second_rise.is_some() && raw.fall.is_some()
            }
        }
    }

    /// Compute, clear the accumulators, then publish, in one step.
    fn complete_cycle(&mut self) {
        self.sequence = Sequence::Complete;
        let computed = self.compute();

        self.raw = RawTicks::default();
        self.sequence = Sequence::AwaitingRise;

        match computed {
            Some(result) => {
                self.result = result;
                self.result_ready = true;
                self.stats.cycles_completed = self.stats.cycles_completed.wrapping_add(1);
            }
            None => {
                self.stats.degenerate_cycles = self.stats.degenerate_cycles.wrapping_add(1);
            }
        }
    }

    fn compute(&self) -> Option<CaptureResult> {
        let rise = self.raw.first_rise?;
        let fall = self.raw.fall?;
        let tick = self.config.tick_duration_secs;

        match self.mode {
            CaptureMode::DirectEdgePair => CaptureResult::from_direct(rise, fall, tick),
            CaptureMode::BracketedCycle { full_scale_ticks } => {
                let second = self.raw.second_rise?;
                let mask = self.config.counter_mask();
                let period = ticks_between(rise, second, mask);
                let pulse = if self.raw.fall_before_second {
                    ticks_between(rise, fall, mask)
                } else {
                    ticks_between(second, fall, mask)
                };
                CaptureResult::from_bracketed(period, pulse, full_scale_ticks, tick)
            }
        }
    }

    // ── Consumer side ─────────────────────────────────────────

    /// Take the latest result if a new one is ready, clearing the flag.
    pub fn take_result(&mut self) -> Option<CaptureResult> {
        if !self.result_ready {
            return None;
        }
        self.result_ready = false;
        Some(self.result)
    }

    /// Latched result (all zeros until the first cycle completes).
    pub fn latest(&self) -> CaptureResult {
        self.result
    }

    /// Frequency in whole hertz.
    pub fn frequency(&self) -> u32 {
        self.result.frequency_hz_whole()
    }

    /// Period in seconds.
    pub fn period(&self) -> f64 {
        self.result.period_secs
    }

    /// Duty cycle in percent (0-100).
    pub fn duty(&self) -> f64 {
        self.result.duty_percent
    }

    /// Pulse width in counter ticks.
    pub fn pulse_width(&self) -> u32 {
        self.result.pulse_width_ticks
    }

    pub fn is_result_ready(&self) -> bool {
        self.result_ready
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    // ── Internal ──────────────────────────────────────────────

    fn arm(&mut self) -> Result<()> {
        if let Err(e) = self.driver.start_channel_capture(self.rise) {
            warn!("capture: arming rise channel {:?} failed: {e}", self.rise);
            return Err(e.into());
        }
        if let Err(e) = self.driver.start_channel_capture(self.fall) {
            warn!("capture: arming fall channel {:?} failed: {e}", self.fall);
            if let Err(undo) = self.driver.stop_channel_capture(self.rise) {
                debug!("capture: rollback of rise channel failed: {undo}");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn disarm(&mut self) -> Result<()> {
        let rise = self.driver.stop_channel_capture(self.rise);
        let fall = self.driver.stop_channel_capture(self.fall);
        rise.and(fall).map_err(|e| {
            warn!("capture: disarm failed: {e}");
            Error::from(e)
        })
    }
}
