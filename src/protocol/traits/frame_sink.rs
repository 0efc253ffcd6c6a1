//! Minimal abstraction over the transmit slot pool drained by the CAN
//! transmit path.
use crate::error::SubmitError;
use crate::protocol::frame::HostFrame;

/// Submission access to the bounded per-bus transmit slots.
///
/// Like [`FrameSource`](super::frame_source::FrameSource), implementations
/// must tolerate interleaving with the interrupt path, and no method may
/// block or suspend.
pub trait FrameSink {
    /// Hand a fully reassembled frame to the transmit path for `bus`.
    fn submit(&mut self, frame: HostFrame, bus: u8) -> Result<(), SubmitError>;

    /// Free transmit slots currently available for `bus`.
    fn free_slots(&self, bus: u8) -> usize;

    /// Smallest free-slot count across every bus this sink serves. Drives
    /// the burst admission check.
    fn min_free_slots(&self) -> usize;
}
