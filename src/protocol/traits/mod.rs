//! Abstraction traits used by the stream engine (receive queue and transmit
//! slot pool seams).
pub mod frame_sink;
pub mod frame_source;
