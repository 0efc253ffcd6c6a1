//! Write-side assembler: reconstructs frames from the chunked byte stream
//! sent by the host and hands each completed frame to the transmit path.
use crate::error::StreamError;
use crate::protocol::frame::{HostFrame, LengthCode, HEADER_LEN};
use crate::protocol::traits::frame_sink::FrameSink;

use super::TailBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Outcome of one write batch.
pub struct WriteReport {
    /// Frames fully reassembled and handed to the transmit path.
    pub submitted: usize,
    /// Frames dropped because their bus pool had no free slot.
    pub dropped: usize,
}

/// Rebuilds frames from arbitrarily chunked input, holding at most one
/// partial frame between calls.
#[derive(Debug)]
pub struct ChunkWriter {
    tail: TailBuffer,
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkWriter {
    /// Writer with no partial frame pending.
    pub const fn new() -> Self {
        Self {
            tail: TailBuffer::new(),
        }
    }

    /// Bytes of the in-progress frame received so far.
    pub fn pending_bytes(&self) -> usize {
        self.tail.filled
    }

    /// Bytes still required to complete the in-progress frame. While the
    /// frame's length is known, `pending_bytes() + missing_bytes()` equals
    /// its total wire length.
    pub fn missing_bytes(&self) -> usize {
        self.tail.needed
    }

    /// Discard the partial frame held for the previous session.
    pub fn reset(&mut self) {
        self.tail.reset();
    }

    /// Consume one inbound chunk. Every frame completed by this input is
    /// submitted immediately, in byte-arrival order; an incomplete trailing
    /// frame is retained for the next call.
    ///
    /// A full slot pool must not desynchronize framing, so a refused frame
    /// is dropped and counted rather than reported as an error. The only
    /// error is a corrupt stream, after which the partial-frame state has
    /// been discarded and the session layer must resynchronize via reset.
    pub fn write<K: FrameSink>(
        &mut self,
        sink: &mut K,
        bytes: &[u8],
    ) -> Result<WriteReport, StreamError> {
        let mut report = WriteReport::default();
        let mut pos = 0;

        // Finish the frame left over from the previous chunk first.
        if self.tail.needed > 0 {
            if self.tail.needed <= bytes.len() {
                let take = self.tail.needed;
                self.tail.stash(&bytes[..take]);
                self.tail.needed = 0;
                pos = take;

                let frame = match HostFrame::from_wire(&self.tail.data[..self.tail.filled]) {
                    Ok(frame) => frame,
                    Err(err) => {
                        self.tail.reset();
                        return Err(StreamError::CorruptStream(err));
                    }
                };
                self.tail.filled = 0;
                dispatch(sink, frame, &mut report);
            } else {
                // Maybe next time.
                self.tail.stash(bytes);
                self.tail.needed -= bytes.len();
                return Ok(report);
            }
        }

        // Rest of the input is a run of complete frames plus, possibly, the
        // head of the next one.
        while pos < bytes.len() {
            let code = match LengthCode::from_raw(bytes[pos] >> 4) {
                Ok(code) => code,
                Err(err) => {
                    self.tail.reset();
                    #[cfg(feature = "defmt")]
                    defmt::warn!("corrupt host stream at offset {}", pos);
                    return Err(StreamError::CorruptStream(err));
                }
            };
            let total = HEADER_LEN + code.payload_len();
            let remaining = bytes.len() - pos;
            if total <= remaining {
                let frame = match HostFrame::from_wire(&bytes[pos..pos + total]) {
                    Ok(frame) => frame,
                    Err(err) => {
                        self.tail.reset();
                        return Err(StreamError::CorruptStream(err));
                    }
                };
                pos += total;
                dispatch(sink, frame, &mut report);
            } else {
                self.tail.stash(&bytes[pos..]);
                self.tail.needed = total - remaining;
                pos = bytes.len();
            }
        }

        Ok(report)
    }
}

/// Route one completed frame to its bus pool, accounting a drop when the
/// pool refuses it.
fn dispatch<K: FrameSink>(sink: &mut K, frame: HostFrame, report: &mut WriteReport) {
    let bus = frame.bus;
    match sink.submit(frame, bus) {
        Ok(()) => report.submitted += 1,
        Err(_) => {
            report.dropped += 1;
            #[cfg(feature = "defmt")]
            defmt::warn!("transmit pool refused frame for bus {}", bus);
        }
    }
}
