//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬──────┬──────┐
//! │ Size (4) │  Id (4)  │ Type (4) │   Body (N)   │ 0x00 │ 0x00 │
//! └──────────┴──────────┴──────────┴──────────────┴──────┴──────┘
//! ```
//!
//! All integers are little-endian `i32`. `Size` counts every byte after
//! itself, so `Size = 10 + N`.

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{RconError, Result};
use super::{Packet, PacketType};

/// Length of the size field that prefixes every packet
pub const SIZE_FIELD_LEN: usize = 4;

/// Id + type + the two terminators
pub(super) const HEADER_AND_TERMINATORS: usize = 10;

/// Smallest legal size field (empty body)
pub const MIN_PACKET_SIZE: i32 = HEADER_AND_TERMINATORS as i32;

/// Largest size field accepted off the wire (4 MB)
pub const MAX_PACKET_SIZE: i32 = 4 * 1024 * 1024;

/// Largest body that fits in a `MAX_PACKET_SIZE` packet
pub const MAX_BODY_LEN: usize = MAX_PACKET_SIZE as usize - HEADER_AND_TERMINATORS;

/// Size field value for a body of `body_len` bytes
///
/// Bodies longer than `MAX_BODY_LEN` are outside the protocol; the session
/// refuses to send them. Past `i32::MAX` the value saturates instead of
/// wrapping.
pub fn size_for_body(body_len: usize) -> i32 {
    HEADER_AND_TERMINATORS
        .checked_add(body_len)
        .and_then(|size| i32::try_from(size).ok())
        .unwrap_or(i32::MAX)
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a packet from its parts
///
/// Format: size (4) + id (4) + type (4) + body + 0x00 + 0x00
pub fn encode(id: i32, packet_type: PacketType, body: &[u8]) -> Bytes {
    let size = size_for_body(body.len());

    let mut buf = BytesMut::with_capacity(SIZE_FIELD_LEN + size as usize);
    buf.put_i32_le(size);
    buf.put_i32_le(id);
    buf.put_i32_le(packet_type.value());
    buf.put_slice(body);
    buf.put_u8(0x00); // body terminator
    buf.put_u8(0x00); // packet terminator

    buf.freeze()
}

/// Encode an already built packet
pub fn encode_packet(packet: &Packet) -> Bytes {
    encode(packet.id, packet.packet_type, &packet.body)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the `size` bytes that followed a size field
///
/// Checks the minimum size and both terminators. The type is passed through
/// unchecked.
pub fn decode(size: i32, bytes: &[u8]) -> Result<Packet> {
    if size < MIN_PACKET_SIZE {
        return Err(RconError::Structural(format!(
            "size below minimum: {} (min {})",
            size, MIN_PACKET_SIZE
        )));
    }

    let len = size as usize;
    if bytes.len() < len {
        return Err(RconError::Structural(format!(
            "frame shorter than its size field: expected {} bytes, got {}",
            len,
            bytes.len()
        )));
    }

    if bytes[len - 2] != 0x00 || bytes[len - 1] != 0x00 {
        return Err(RconError::Structural(format!(
            "non-zero terminator: {:02x} {:02x}",
            bytes[len - 2],
            bytes[len - 1]
        )));
    }

    let mut header = &bytes[..8];
    let id = header.get_i32_le();
    let packet_type = PacketType(header.get_i32_le());
    let body = bytes[8..len - 2].to_vec();

    Ok(Packet {
        size,
        id,
        packet_type,
        body,
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read exactly one packet from a stream
///
/// A stream that ends mid-frame is a transport error; bad frame contents are
/// structural errors.
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let mut size_bytes = [0u8; SIZE_FIELD_LEN];
    read_frame_part(reader, &mut size_bytes, "size header")?;
    let size = i32::from_le_bytes(size_bytes);

    if size < MIN_PACKET_SIZE {
        return decode(size, &[]);
    }
    if size > MAX_PACKET_SIZE {
        return Err(RconError::Structural(format!(
            "size exceeds maximum: {} (max {})",
            size, MAX_PACKET_SIZE
        )));
    }

    let mut frame = vec![0u8; size as usize];
    read_frame_part(reader, &mut frame, "body")?;

    decode(size, &frame)
}

fn read_frame_part<R: Read>(reader: &mut R, buf: &mut [u8], part: &str) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(RconError::Transport(format!("short read on {}", part)))
        }
        Err(e) => Err(RconError::Io(e)),
    }
}

/// Write a packet to a stream
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
