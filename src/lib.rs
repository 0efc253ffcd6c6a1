//! `canlink` library: framing layer for a CAN interface device that bridges
//! a host computer (USB or SPI) and one or more physical CAN buses in a
//! `no_std` environment. Frames are packed back-to-back into fixed-size
//! transport chunks with no chunk-level header, so the crate's core is the
//! pair of assemblers that split and rebuild frames across chunk boundaries
//! with bounded state and no allocation.
#![no_std]
//==================================================================================
/// Domain and low-level errors (wire codec, stream reassembly, transmit
/// submission).
pub mod error;
/// Host-link protocol implementation: wire format, collaborator seams,
/// channel-backed queues, and the chunked stream engine.
pub mod protocol;
//==================================================================================
