//! Wire representation of a CAN message on the host link: a six-byte header
//! followed by a classic (0-8 byte) or FD (0-64 byte) payload.
//!
//! Byte layout, no alignment padding:
//!
//! ```text
//! byte 0        length_code[7:4] | bus[3:1] | fd[0]
//! bytes 1..=4   little-endian (address << 3) | (extended << 2)
//!               | (returned << 1) | rejected
//! byte 5        XOR checksum of bytes 0..=4 and every payload byte
//! bytes 6..     payload, length selected by the length-class code
//! ```
use crate::error::FrameCodecError;
use embedded_can::{ExtendedId, Id, StandardId};

/// Fixed header size preceding the payload on the wire.
pub const HEADER_LEN: usize = 6;
/// Largest classic CAN payload.
pub const MAX_CLASSIC_PAYLOAD: usize = 8;
/// Largest CAN FD payload.
pub const MAX_FD_PAYLOAD: usize = 64;
/// Largest possible on-wire frame (header plus FD payload).
pub const MAX_FRAME_WIRE: usize = HEADER_LEN + MAX_FD_PAYLOAD;

/// Payload length selected by each of the sixteen length-class codes.
/// Codes 0-8 cover classic CAN, codes 9-15 the CAN FD sizes.
const LENGTH_TABLE: [usize; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Mask for the 29-bit identifier field.
const ADDRESS_MASK: u32 = 0x1FFF_FFFF;

//==================================================================================LENGTH_CODE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// 4-bit length-class selector stored in the upper nibble of a frame's
/// first byte.
pub struct LengthCode(u8);

impl LengthCode {
    /// Checked constructor from a raw code. This is the only path from
    /// untrusted bytes to a length-table index; once construction succeeds,
    /// the lookup itself is total.
    pub const fn from_raw(code: u8) -> Result<Self, FrameCodecError> {
        if code as usize >= LENGTH_TABLE.len() {
            return Err(FrameCodecError::UnknownLengthCode { code });
        }
        Ok(Self(code))
    }

    /// Code selecting exactly `len` payload bytes, when one exists.
    pub fn from_payload_len(len: usize) -> Result<Self, FrameCodecError> {
        LENGTH_TABLE
            .iter()
            .position(|&entry| entry == len)
            .map(|code| Self(code as u8))
            .ok_or(FrameCodecError::UnencodablePayload { len })
    }

    /// Raw 4-bit code.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Payload length in bytes selected by this code.
    pub const fn payload_len(self) -> usize {
        LENGTH_TABLE[self.0 as usize]
    }
}

//==================================================================================HOST_FRAME
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One complete CAN message as exchanged between host and device.
///
/// Construction and the fluent setters keep the checksum byte coherent.
/// Frames parsed off the wire keep whatever checksum the host sent; this
/// layer never judges it (validation belongs to downstream consumers).
pub struct HostFrame {
    /// Physical CAN bus the frame belongs to (3 bits).
    pub bus: u8,
    /// Length-class code selecting the payload size.
    pub length_code: LengthCode,
    /// CAN FD frame marker.
    pub fd: bool,
    /// 11-bit or 29-bit CAN identifier, per `extended`.
    pub address: u32,
    /// Extended (29-bit) identifier marker.
    pub extended: bool,
    /// Set on frames echoed back to the host after transmission.
    pub returned: bool,
    /// Set on frames the device refused to forward.
    pub rejected: bool,
    /// XOR checksum byte, as computed at construction or read off the wire.
    pub checksum: u8,
    /// Payload buffer. Only the first `length_code.payload_len()` bytes are
    /// valid.
    pub data: [u8; MAX_FD_PAYLOAD],
}

impl HostFrame {
    /// Build a frame for `payload`, which must match a length class exactly.
    ///
    /// The FD marker is set when the payload cannot fit a classic frame and
    /// the extended marker when the address cannot fit 11 bits; both can be
    /// overridden with the fluent setters.
    pub fn new(bus: u8, address: u32, payload: &[u8]) -> Result<Self, FrameCodecError> {
        let length_code = LengthCode::from_payload_len(payload.len())?;
        let mut data = [0u8; MAX_FD_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        let mut frame = Self {
            bus: bus & 0x07,
            length_code,
            fd: payload.len() > MAX_CLASSIC_PAYLOAD,
            address: address & ADDRESS_MASK,
            extended: address > StandardId::MAX.as_raw() as u32,
            returned: false,
            rejected: false,
            checksum: 0,
            data,
        };
        frame.checksum = frame.compute_checksum();
        Ok(frame)
    }

    /// Force the CAN FD marker (small FD frames are indistinguishable from
    /// classic ones by length alone).
    pub fn fd(mut self, fd: bool) -> Self {
        self.fd = fd;
        self.checksum = self.compute_checksum();
        self
    }

    /// Force the extended-identifier marker.
    pub fn extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self.checksum = self.compute_checksum();
        self
    }

    /// Flag the frame as an echo of a completed transmission.
    pub fn returned(mut self, returned: bool) -> Self {
        self.returned = returned;
        self.checksum = self.compute_checksum();
        self
    }

    /// Flag the frame as rejected by the device.
    pub fn rejected(mut self, rejected: bool) -> Self {
        self.rejected = rejected;
        self.checksum = self.compute_checksum();
        self
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.length_code.payload_len()]
    }

    /// Total on-wire length of the frame.
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.length_code.payload_len()
    }

    /// Identifier in `embedded-can` form, ready for a peripheral driver.
    pub fn can_id(&self) -> Id {
        if self.extended {
            let raw = self.address & ExtendedId::MAX.as_raw();
            Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::ZERO))
        } else {
            let raw = self.address as u16 & StandardId::MAX.as_raw();
            Id::Standard(StandardId::new(raw).unwrap_or(StandardId::ZERO))
        }
    }

    /// XOR of the five leading header bytes and every payload byte.
    pub fn compute_checksum(&self) -> u8 {
        let header = self.header_bytes();
        let mut checksum = 0u8;
        for byte in header.iter().chain(self.payload()) {
            checksum ^= byte;
        }
        checksum
    }

    /// Serialize into an owned buffer. Infallible: every frame fits in
    /// `MAX_FRAME_WIRE` bytes by construction.
    pub fn to_wire(&self) -> WireFrame {
        let mut bytes = [0u8; MAX_FRAME_WIRE];
        let len = self.wire_len();
        bytes[..5].copy_from_slice(&self.header_bytes());
        bytes[5] = self.checksum;
        bytes[HEADER_LEN..len].copy_from_slice(self.payload());
        WireFrame { bytes, len }
    }

    /// Serialize into a caller-provided buffer.
    pub fn write_wire(&self, out: &mut [u8]) -> Result<usize, FrameCodecError> {
        let len = self.wire_len();
        if out.len() < len {
            return Err(FrameCodecError::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        }
        out[..5].copy_from_slice(&self.header_bytes());
        out[5] = self.checksum;
        out[HEADER_LEN..len].copy_from_slice(self.payload());
        Ok(len)
    }

    /// Extract one frame from the start of `bytes` with bounds-checked field
    /// extraction. Checksum and address legality are deliberately not
    /// validated here; the received checksum byte is preserved verbatim so
    /// downstream consumers can judge it.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, FrameCodecError> {
        if bytes.len() < HEADER_LEN {
            return Err(FrameCodecError::TruncatedFrame {
                expected: HEADER_LEN,
                found: bytes.len(),
            });
        }
        let length_code = LengthCode::from_raw(bytes[0] >> 4)?;
        let total = HEADER_LEN + length_code.payload_len();
        if bytes.len() < total {
            return Err(FrameCodecError::TruncatedFrame {
                expected: total,
                found: bytes.len(),
            });
        }
        let packed = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        let mut data = [0u8; MAX_FD_PAYLOAD];
        data[..length_code.payload_len()].copy_from_slice(&bytes[HEADER_LEN..total]);
        Ok(Self {
            bus: (bytes[0] >> 1) & 0x07,
            length_code,
            fd: bytes[0] & 0x01 != 0,
            address: packed >> 3,
            extended: packed & 0b100 != 0,
            returned: packed & 0b010 != 0,
            rejected: packed & 0b001 != 0,
            checksum: bytes[5],
            data,
        })
    }

    /// Bytes 0..=4 of the header; byte 5 (checksum) is kept separately so
    /// a wire-parsed frame round-trips byte-for-byte.
    fn header_bytes(&self) -> [u8; 5] {
        let packed = ((self.address & ADDRESS_MASK) << 3)
            | ((self.extended as u32) << 2)
            | ((self.returned as u32) << 1)
            | (self.rejected as u32);
        let addr = packed.to_le_bytes();
        [
            (self.length_code.raw() << 4) | ((self.bus & 0x07) << 1) | (self.fd as u8),
            addr[0],
            addr[1],
            addr[2],
            addr[3],
        ]
    }
}

//==================================================================================WIRE_FRAME
#[derive(Debug, Clone, PartialEq, Eq)]
/// Owned serialization of a single frame, returned without exposing any
/// internal buffer.
pub struct WireFrame {
    /// Serialized bytes; only the first `len` are valid.
    pub bytes: [u8; MAX_FRAME_WIRE],
    /// Effective wire length.
    pub len: usize,
}

impl WireFrame {
    /// Valid wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
