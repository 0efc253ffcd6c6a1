//! Read-side assembler: turns the queue of received frames into the chunked
//! byte stream served to the host.
use crate::protocol::traits::frame_source::FrameSource;

use super::TailBuffer;

/// Streams serialized frames into caller-sized chunks, holding the unsent
/// tail of the most recently popped frame between calls.
#[derive(Debug)]
pub struct ChunkReader {
    tail: TailBuffer,
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkReader {
    /// Reader with no partial frame pending.
    pub const fn new() -> Self {
        Self {
            tail: TailBuffer::new(),
        }
    }

    /// Bytes of the most recently popped frame still awaiting delivery.
    pub fn pending_bytes(&self) -> usize {
        self.tail.filled
    }

    /// Discard the partial frame held for the previous session.
    pub fn reset(&mut self) {
        self.tail.reset();
    }

    /// Fill `dest` with as many whole-or-partial frame bytes as possible and
    /// return the count.
    ///
    /// A popped frame is committed: its bytes end up in `dest` or in the
    /// tail buffer, never back in the queue. The caller chooses `dest`'s
    /// size freely per call (any capacity ≥ 1 makes progress) and must keep
    /// calling until a call returns fewer bytes than requested, or the tail
    /// of the last frame starves in the buffer.
    pub fn read<S: FrameSource>(&mut self, source: &mut S, dest: &mut [u8]) -> usize {
        let mut pos = 0;

        // Tail of the previous frame goes out first.
        if self.tail.filled > 0 {
            let take = self.tail.filled.min(dest.len());
            dest[..take].copy_from_slice(&self.tail.data[..take]);
            self.tail.data.copy_within(take..self.tail.filled, 0);
            self.tail.filled -= take;
            pos = take;
        }

        // Destination filled before the tail drained.
        if self.tail.filled > 0 {
            return pos;
        }

        while pos < dest.len() {
            let frame = match source.pop_frame() {
                Some(frame) => frame,
                None => break,
            };
            let wire = frame.to_wire();
            let bytes = wire.as_bytes();
            let room = dest.len() - pos;
            if bytes.len() <= room {
                dest[pos..pos + bytes.len()].copy_from_slice(bytes);
                pos += bytes.len();
            } else {
                // Frame straddles the chunk boundary: ship the prefix now,
                // park the suffix, and stop popping.
                dest[pos..].copy_from_slice(&bytes[..room]);
                self.tail.stash(&bytes[room..]);
                pos = dest.len();
            }
        }

        pos
    }
}
