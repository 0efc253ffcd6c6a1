//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (wire codec, inbound byte
//! stream, transmit submission).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur while encoding or decoding a frame on the wire.
pub enum FrameCodecError {
    /// The length-class code is outside the recognized table. Raw codes are
    /// never used to index the length table without passing this check.
    #[error("Unknown length-class code: {code}")]
    UnknownLengthCode { code: u8 },
    /// No length class encodes this exact payload size.
    #[error("No length class encodes a {len}-byte payload")]
    UnencodablePayload { len: usize },
    /// Provided output buffer is too small for the serialized frame.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// Input ends before the frame declared by its header does.
    #[error("Truncated frame -> expected: {expected} bytes, found: {found}")]
    TruncatedFrame { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while reassembling frames from the inbound byte stream.
pub enum StreamError {
    /// The stream cannot be framed any further; the partial-frame state has
    /// been discarded and the session layer must resynchronize via reset.
    #[error("Corrupt byte stream: {0}")]
    CorruptStream(#[from] FrameCodecError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors returned when handing a reassembled frame to the transmit path.
pub enum SubmitError {
    /// The per-bus slot pool has no free slot left.
    #[error("Transmit slots exhausted on bus {bus}")]
    SlotsExhausted { bus: u8 },
    /// The frame names a bus this sink does not serve.
    #[error("Bus {bus} is not served by this sink")]
    UnknownBus { bus: u8 },
}
