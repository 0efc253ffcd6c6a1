//! # Quickstart Example
//!
//! Minimal walkthrough of the host-link engine:
//! - enqueue frames the way the CAN receive path would
//! - stream them to the host in fixed-size transport chunks
//! - feed the same chunks back in and watch the frames reassemble
//!
//! This example uses `std` for a quick trial run; on a device the same calls
//! run from the USB/SPI transport context.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use canlink::protocol::frame::HostFrame;
use canlink::protocol::link::HostLink;
use canlink::protocol::queue::{FrameChannel, ReceiveQueue, TransmitSlots};

fn main() {
    println!("=== canlink Quickstart ===\n");

    // ======================================================================
    // 1. Pre-allocated channels: receive queue plus one slot pool per bus
    // ======================================================================
    let rx = FrameChannel::<8>::new();
    let bus0 = FrameChannel::<8>::new();
    let bus1 = FrameChannel::<8>::new();

    // ======================================================================
    // 2. The CAN receive path enqueues a few frames
    // ======================================================================
    println!("1. Enqueueing received frames");
    let driver_side = ReceiveQueue::new(&rx);
    let frames = [
        HostFrame::new(0, 0x123, &[0x11, 0x22, 0x33]).unwrap(),
        HostFrame::new(1, 0x18DB_33F1, &[0x44; 12]).unwrap(),
        HostFrame::new(0, 0x7FF, &[]).unwrap(),
    ];
    for frame in &frames {
        driver_side.try_feed(frame.clone()).unwrap();
        println!(
            "   bus {} id {:?} ({} payload bytes)",
            frame.bus,
            frame.can_id(),
            frame.payload().len()
        );
    }

    // ======================================================================
    // 3. Stream the queue to the host in 16-byte transport chunks
    // ======================================================================
    println!("\n2. Reading 16-byte chunks (frames straddle boundaries freely)");
    let mut link = HostLink::new(ReceiveQueue::new(&rx), TransmitSlots::new([&bus0, &bus1]));
    link.reset();

    let mut stream = Vec::new();
    let mut chunk = [0u8; 16];
    loop {
        let written = link.read(&mut chunk);
        println!("   chunk of {written} bytes: {:02X?}", &chunk[..written]);
        stream.extend_from_slice(&chunk[..written]);
        if written < chunk.len() {
            break;
        }
    }

    // ======================================================================
    // 4. Feed the byte stream back as host writes
    // ======================================================================
    println!("\n3. Writing the stream back in 7-byte chunks");
    let mut submitted = 0;
    for piece in stream.chunks(7) {
        let outcome = link.write(piece).unwrap();
        submitted += outcome.submitted;
        if outcome.submitted > 0 {
            println!(
                "   {} frame(s) completed, admission: usb={} spi={}",
                outcome.submitted, outcome.admission.usb, outcome.admission.spi
            );
        }
    }
    println!("   total reassembled: {submitted}");

    // ======================================================================
    // 5. The transmit path drains the per-bus pools
    // ======================================================================
    println!("\n4. Draining the transmit slots");
    let slots = link.sink_mut();
    for bus in 0..2 {
        while let Some(frame) = slots.try_outgoing(bus) {
            println!("   bus {bus} -> id {:?}", frame.can_id());
        }
    }
}
