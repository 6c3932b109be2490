//! Port traits: the boundary between the capture engine and the timer driver.
//!
//! ```text
//!   Timer driver ──▶ ChannelDriver ──▶ CaptureEngine
//!        ▲                                  │
//!        └──── start/stop channel capture ◀─┘
//! ```
//!
//! The engine never touches timer registers.  A driver adapter implements
//! [`ChannelDriver`] for one timer instance; the engine consumes it via
//! generics, so the whole state machine is testable against a mock.

use core::fmt::Debug;

use crate::error::ChannelError;

// ───────────────────────────────────────────────────────────────
// Channel driver port (driven adapter: engine ↔ timer peripheral)
// ───────────────────────────────────────────────────────────────

/// Arms, disarms, and identifies the input-capture channels of one timer.
///
/// # Delivery contract
///
/// The driver forwards every qualifying edge to
/// [`CaptureEngine::on_edge_event`](crate::capture::CaptureEngine::on_edge_event)
/// at most once, tagged with the same [`Channel`](Self::Channel) value that
/// [`map_channel`](Self::map_channel) returned, and with the raw counter
/// value latched at the edge.  The engine does no debouncing.
pub trait ChannelDriver {
    /// Normalised channel tag, as reported by the capture interrupt.
    type Channel: Copy + Eq + Debug;

    /// Resolve a raw channel selector into the tag the interrupt reports.
    /// Unknown selectors must be rejected with [`ChannelError::Unmapped`].
    fn map_channel(&self, raw: u32) -> Result<Self::Channel, ChannelError>;

    /// True if `channel` names a single capture input the interrupt can
    /// report edges on.  Aggregate selectors that only make sense for bulk
    /// arm/disarm must return `false`.
    fn is_capture_channel(&self, _channel: Self::Channel) -> bool {
        true
    }

    /// Clear any pending capture flag and enable edge interrupts on `channel`.
    fn start_channel_capture(&mut self, channel: Self::Channel) -> Result<(), ChannelError>;

    /// Disable edge interrupts on `channel`.  Disarming a channel that is
    /// already idle must succeed.
    fn stop_channel_capture(&mut self, channel: Self::Channel) -> Result<(), ChannelError>;
}
