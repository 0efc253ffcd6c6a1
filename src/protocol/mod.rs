//! Host-link protocol implementation: frame wire format, collaborator
//! abstraction traits, channel-backed queues, and the chunked stream engine.

pub mod frame;
pub mod link;
pub mod queue;
pub mod traits;
