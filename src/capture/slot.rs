//! Interrupt-shared home for one capture engine.
//!
//! The capture ISR and the main loop both need the engine.  A
//! [`CaptureSlot`] is a `static`-friendly cell that holds at most one engine
//! and serialises every access through a critical section, which masks the
//! capture interrupt on target.  It also models the engine's handle
//! lifecycle: `init` on an occupied slot is rejected, and lifecycle calls on
//! an empty slot report [`Error::NotInitialized`].
//!
//! ```ignore
//! static CAPTURE: CaptureSlot<BoardTimer> = CaptureSlot::new();
//!
//! fn tim_cc_isr(channel: ActiveChannel, ccr: u32) {
//!     CAPTURE.on_edge_event(channel, ccr);
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use super::{CaptureEngine, CaptureResult};
use crate::config::{CaptureConfig, CaptureMode};
use crate::error::{Error, Result};
use crate::ports::ChannelDriver;

pub struct CaptureSlot<D: ChannelDriver> {
    inner: Mutex<RefCell<Option<CaptureEngine<D>>>>,
}

impl<D: ChannelDriver> CaptureSlot<D> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Build an engine into the slot.  Fails with [`Error::InvalidState`] if
    /// one is already there; construction errors are passed through and
    /// leave the slot empty.
    pub fn init(&self, config: CaptureConfig, mode: CaptureMode, driver: D) -> Result<()> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(Error::InvalidState);
            }
            *slot = Some(CaptureEngine::new(config, mode, driver)?);
            Ok(())
        })
    }

    /// Disarm, drop the engine, and return its driver.
    pub fn release(&self) -> Result<D> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
            .map(CaptureEngine::release)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&self) -> Result<()> {
        self.lifecycle(CaptureEngine::start)
    }

    pub fn stop(&self) -> Result<()> {
        self.lifecycle(CaptureEngine::stop)
    }

    pub fn reset(&self) -> Result<()> {
        self.lifecycle(CaptureEngine::reset)
    }

    // ── Interrupt path ────────────────────────────────────────

    /// Forward an edge from the capture interrupt.  Dropped if empty.
    pub fn on_edge_event(&self, channel: D::Channel, counter: u32) {
        self.with_engine(|e| e.on_edge_event(channel, counter));
    }

    // ── Consumer side ─────────────────────────────────────────
    //
    // Each call takes its own critical section.  A cycle can complete
    // between two calls, so reading `frequency()` then `duty()` may mix two
    // cycles.  Use `take_result` or `latest` for a consistent snapshot.

    pub fn take_result(&self) -> Option<CaptureResult> {
        self.with_engine(CaptureEngine::take_result).flatten()
    }

    /// Last latched result, copied whole under one critical section.
    /// Zero on an empty slot.  Leaves the ready flag alone.
    pub fn latest(&self) -> CaptureResult {
        self.read(CaptureEngine::latest)
    }

    pub fn is_result_ready(&self) -> bool {
        self.read(CaptureEngine::is_result_ready)
    }

    pub fn frequency(&self) -> u32 {
        self.read(CaptureEngine::frequency)
    }

    pub fn period(&self) -> f64 {
        self.read(CaptureEngine::period)
    }

    pub fn duty(&self) -> f64 {
        self.read(CaptureEngine::duty)
    }

    pub fn pulse_width(&self) -> u32 {
        self.read(CaptureEngine::pulse_width)
    }

    /// Run `f` against the engine inside a critical section.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut CaptureEngine<D>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    // ── Internal ──────────────────────────────────────────────

    fn lifecycle(&self, f: impl FnOnce(&mut CaptureEngine<D>) -> Result<()>) -> Result<()> {
        self.with_engine(f).unwrap_or(Err(Error::NotInitialized))
    }

    /// Accessor helper: zero/default when the slot is empty.
    fn read<R: Default>(&self, f: impl FnOnce(&CaptureEngine<D>) -> R) -> R {
        critical_section::with(|cs| self.inner.borrow_ref(cs).as_ref().map(f))
            .unwrap_or_default()
    }
}

impl<D: ChannelDriver> Default for CaptureSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}
