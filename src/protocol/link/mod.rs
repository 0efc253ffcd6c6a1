//! Chunked byte-stream engine bridging the frame queues and the USB/SPI
//! transport: read-side assembly (frames → chunks), write-side reassembly
//! (chunks → frames), and transmit admission levels.
//!
//! Transport chunks carry concatenated frame bytes with no per-chunk header,
//! so a frame routinely straddles a chunk boundary in either direction. Each
//! direction keeps one single-slot [`TailBuffer`] for the partial frame in
//! flight; both are wiped by [`HostLink::reset`] at the start of a session,
//! and a partial frame never survives a session change.
use crate::error::StreamError;
use crate::protocol::frame::HEADER_LEN;
use crate::protocol::traits::frame_sink::FrameSink;
use crate::protocol::traits::frame_source::FrameSource;

pub mod reader;
pub mod writer;

pub use reader::ChunkReader;
pub use writer::{ChunkWriter, WriteReport};

//==================================================================================Constants

/// Capacity of the per-direction overflow buffer. Must hold one complete
/// frame; `MAX_FRAME_WIRE` rounded up to a word multiple.
pub const TAIL_CAPACITY: usize = 72;

/// USB bulk transfer chunk size on the host link.
pub const USB_CHUNK_BYTES: usize = 256;
/// SPI transfer chunk size on the host link.
pub const SPI_CHUNK_BYTES: usize = 1024;

/// Transmit slots to reserve before resuming USB writes: worst case a chunk
/// carries nothing but minimum-length frames.
pub const USB_BURST_FRAMES: usize = USB_CHUNK_BYTES.div_ceil(HEADER_LEN);
/// Transmit slots to reserve before resuming SPI writes.
pub const SPI_BURST_FRAMES: usize = SPI_CHUNK_BYTES.div_ceil(HEADER_LEN);

//==================================================================================TailBuffer

/// Single-slot holding area for a frame whose bytes span more than one
/// transport chunk. One instance per direction, nothing shared.
#[derive(Debug)]
pub(crate) struct TailBuffer {
    pub(crate) data: [u8; TAIL_CAPACITY],
    /// Valid bytes currently held.
    pub(crate) filled: usize,
    /// Bytes still missing to complete the in-progress frame (write side
    /// only; stays zero on the read side).
    pub(crate) needed: usize,
}

impl TailBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            data: [0; TAIL_CAPACITY],
            filled: 0,
            needed: 0,
        }
    }

    /// Drop any partial frame. Stale bytes are overwritten before they can
    /// be read again, so the data array is left alone.
    pub(crate) fn reset(&mut self) {
        self.filled = 0;
        self.needed = 0;
    }

    /// Append `bytes` after the current fill. Callers uphold
    /// `filled + bytes.len() <= TAIL_CAPACITY`; every frame fits because
    /// `TAIL_CAPACITY >= MAX_FRAME_WIRE`.
    pub(crate) fn stash(&mut self, bytes: &[u8]) {
        self.data[self.filled..self.filled + bytes.len()].copy_from_slice(bytes);
        self.filled += bytes.len();
    }
}

//==================================================================================Admission

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Level-triggered transmit admission: whether the slot pool can absorb one
/// full burst per transport kind. The transport layer decides how to act on
/// a released level (resume USB bulk reads, re-arm the SPI handler, ...).
pub struct Admission {
    /// Enough free slots for a worst-case USB bulk chunk.
    pub usb: bool,
    /// Enough free slots for a worst-case SPI chunk.
    pub spi: bool,
}

impl Admission {
    /// Recompute the levels from the sink's current free capacity. May
    /// report an already-resumed transport as admissible again; redundant
    /// signaling is harmless.
    pub fn level(sink: &impl FrameSink) -> Self {
        let free = sink.min_free_slots();
        Self {
            usb: free >= USB_BURST_FRAMES,
            spi: free >= SPI_BURST_FRAMES,
        }
    }
}

//==================================================================================HostLink

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of one write batch: frames handed to the transmit path plus the
/// refreshed admission levels.
pub struct WriteOutcome {
    /// Frames fully reassembled and submitted this call.
    pub submitted: usize,
    /// Frames dropped because their bus pool had no free slot.
    pub dropped: usize,
    /// Admission levels after the batch.
    pub admission: Admission,
}

/// Facade owning both directions of the host link for one connection.
///
/// The two directions touch disjoint state and may run on separate execution
/// contexts, but calls within one direction must stay strictly sequential.
pub struct HostLink<S: FrameSource, K: FrameSink> {
    reader: ChunkReader,
    writer: ChunkWriter,
    source: S,
    sink: K,
}

impl<S: FrameSource, K: FrameSink> HostLink<S, K> {
    /// Assemble a link over the two collaborator seams.
    pub fn new(source: S, sink: K) -> Self {
        Self {
            reader: ChunkReader::new(),
            writer: ChunkWriter::new(),
            source,
            sink,
        }
    }

    /// Fill `dest` with outbound frame bytes and return the count written.
    /// Returns less than `dest.len()` only when the receive queue ran empty.
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        self.reader.read(&mut self.source, dest)
    }

    /// Consume one inbound chunk, submitting every frame it completes, and
    /// report the refreshed admission levels.
    pub fn write(&mut self, bytes: &[u8]) -> Result<WriteOutcome, StreamError> {
        let report = self.writer.write(&mut self.sink, bytes)?;
        Ok(WriteOutcome {
            submitted: report.submitted,
            dropped: report.dropped,
            admission: Admission::level(&self.sink),
        })
    }

    /// Wipe both directions' partial-frame state. Must run once per new
    /// transport session, before the session's first read or write;
    /// idempotent, so an extra reset on empty buffers changes nothing.
    pub fn reset(&mut self) {
        self.reader.reset();
        self.writer.reset();
        #[cfg(feature = "defmt")]
        defmt::debug!("host link session reset");
    }

    /// Current admission levels, for transmit-completion re-checks outside
    /// the write path.
    pub fn admission(&self) -> Admission {
        Admission::level(&self.sink)
    }

    /// Collaborator access for the surrounding firmware.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Collaborator access for the surrounding firmware.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
