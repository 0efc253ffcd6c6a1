/// Test doubles and frame factories shared by the integration suites.
use canlink::error::SubmitError;
use canlink::protocol::frame::HostFrame;
use canlink::protocol::traits::frame_sink::FrameSink;

#[allow(dead_code)]
pub fn frame(bus: u8, address: u32, payload: &[u8]) -> HostFrame {
    HostFrame::new(bus, address, payload).unwrap()
}

#[allow(dead_code)]
/// Serialize `frames` back to back, the way they travel on the link.
pub fn serialize_all(frames: &[HostFrame]) -> Vec<u8> {
    let mut stream = Vec::new();
    for frame in frames {
        stream.extend_from_slice(frame.to_wire().as_bytes());
    }
    stream
}

#[allow(dead_code)]
/// Mixed frame population exercising the size-class boundaries: empty,
/// classic, FD, standard and extended identifiers.
pub fn assorted_frames() -> Vec<HostFrame> {
    vec![
        frame(0, 0x100, &[]),
        frame(1, 0x7FF, &[1]),
        frame(2, 0x1FFF_FFFF, &[2; 8]),
        frame(0, 0x18DB_33F1, &[3; 12]).fd(true),
        frame(1, 0x42, &[4; 64]),
        frame(0, 0x555, &[5, 6, 7]),
    ]
}

/// Sink recording every accepted frame, with a tunable free-slot level.
#[allow(dead_code)]
pub struct RecordingSink {
    pub free: usize,
    pub frames: Vec<(u8, HostFrame)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn with_free(free: usize) -> Self {
        Self {
            free,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for RecordingSink {
    fn submit(&mut self, frame: HostFrame, bus: u8) -> Result<(), SubmitError> {
        if self.free == 0 {
            return Err(SubmitError::SlotsExhausted { bus });
        }
        self.free -= 1;
        self.frames.push((bus, frame));
        Ok(())
    }

    fn free_slots(&self, _bus: u8) -> usize {
        self.free
    }

    fn min_free_slots(&self) -> usize {
        self.free
    }
}
