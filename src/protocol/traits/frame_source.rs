//! Minimal abstraction over the queue of frames received from the CAN buses.
//! Allows the engine to plug into various implementations (channel-backed,
//! driver-owned ring, test double).
use crate::protocol::frame::HostFrame;

/// Pop access to the bounded receive queue.
///
/// Implementations must tolerate interleaving with the interrupt path that
/// enqueues frames. The call never blocks or suspends; the engine runs on
/// whatever execution context the transport layer uses.
pub trait FrameSource {
    /// Take the oldest received frame, if any.
    fn pop_frame(&mut self) -> Option<HostFrame>;
}
