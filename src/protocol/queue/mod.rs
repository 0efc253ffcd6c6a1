//! Channel-backed implementations of the collaborator seams.
//!
//! Firmware provides pre-allocated [`embassy_sync::channel::Channel`]
//! instances (typically through `static_cell`); the library performs no
//! allocation and never owns the statics. The channels use a
//! critical-section mutex, so the driver/interrupt side and the link engine
//! may touch them from different execution contexts.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::error::SubmitError;
use crate::protocol::frame::HostFrame;
use crate::protocol::traits::frame_sink::FrameSink;
use crate::protocol::traits::frame_source::FrameSource;

/// Bounded frame channel shared between a driver context and the engine.
pub type FrameChannel<const N: usize> = Channel<CriticalSectionRawMutex, HostFrame, N>;

//==================================================================================RECEIVE_QUEUE
/// Receive queue: the CAN receive path feeds it, the read-side assembler
/// pops it.
pub struct ReceiveQueue<'a, const N: usize> {
    channel: &'a FrameChannel<N>,
}

impl<'a, const N: usize> ReceiveQueue<'a, N> {
    /// Wrap a pre-allocated channel.
    pub fn new(channel: &'a FrameChannel<N>) -> Self {
        Self { channel }
    }

    /// Driver side: enqueue a received frame, waiting while the host is
    /// slow to drain the stream.
    pub async fn feed(&self, frame: HostFrame) {
        self.channel.send(frame).await;
    }

    /// Driver side, interrupt-safe: enqueue without waiting. Returns the
    /// frame when the queue is full so the caller can account the loss.
    pub fn try_feed(&self, frame: HostFrame) -> Result<(), HostFrame> {
        match self.channel.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(frame)) => Err(frame),
        }
    }

    /// Frames currently waiting to be streamed to the host.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// True when no received frame is waiting.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> FrameSource for ReceiveQueue<'_, N> {
    fn pop_frame(&mut self) -> Option<HostFrame> {
        self.channel.try_receive().ok()
    }
}

//==================================================================================TRANSMIT_SLOTS
/// Per-bus transmit slot pools: the write-side assembler submits, the CAN
/// transmit path drains.
pub struct TransmitSlots<'a, const N: usize, const BUSES: usize> {
    channels: [&'a FrameChannel<N>; BUSES],
}

impl<'a, const N: usize, const BUSES: usize> TransmitSlots<'a, N, BUSES> {
    /// Wrap one pre-allocated channel per bus, indexed by bus id.
    pub fn new(channels: [&'a FrameChannel<N>; BUSES]) -> Self {
        Self { channels }
    }

    /// Driver side: wait for the next frame queued for `bus`.
    ///
    /// Panics when `bus >= BUSES`; the transmit path addresses buses it
    /// physically has.
    pub async fn outgoing(&self, bus: usize) -> HostFrame {
        self.channels[bus].receive().await
    }

    /// Driver side, interrupt-safe: take the next frame for `bus` without
    /// waiting.
    pub fn try_outgoing(&self, bus: usize) -> Option<HostFrame> {
        self.channels.get(bus)?.try_receive().ok()
    }
}

impl<const N: usize, const BUSES: usize> FrameSink for TransmitSlots<'_, N, BUSES> {
    fn submit(&mut self, frame: HostFrame, bus: u8) -> Result<(), SubmitError> {
        let channel = self
            .channels
            .get(bus as usize)
            .ok_or(SubmitError::UnknownBus { bus })?;
        channel
            .try_send(frame)
            .map_err(|_| SubmitError::SlotsExhausted { bus })
    }

    fn free_slots(&self, bus: u8) -> usize {
        self.channels
            .get(bus as usize)
            .map(|channel| channel.free_capacity())
            .unwrap_or(0)
    }

    fn min_free_slots(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.free_capacity())
            .min()
            .unwrap_or(0)
    }
}
