//! Packet definitions
//!
//! The single framed unit of the RCON protocol.

use std::fmt;

use super::text;

/// Packet type field
///
/// The wire value 2 means EXEC_COMMAND on a request and AUTH_RESPONSE on a
/// response. The two constants are equal, so a `PacketType` on its own never
/// tells them apart; only the phase of the exchange does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType(pub i32);

impl PacketType {
    /// Request: authenticate with the body as password
    pub const AUTH: Self = Self(3);

    /// Request: run the body as a console command
    pub const EXEC_COMMAND: Self = Self(2);

    /// Response to AUTH
    pub const AUTH_RESPONSE: Self = Self(2);

    /// Response to EXEC_COMMAND
    pub const RESPONSE_VALUE: Self = Self(0);

    /// Raw wire value
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded or to-be-encoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Bytes following the size field: id + type + body + 2 terminators
    pub(super) size: i32,

    /// Request id, echoed by the server
    pub id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// Body without its terminator
    pub body: Vec<u8>,
}

impl Packet {
    /// Build a packet, computing `size` from the body
    pub fn new(id: i32, packet_type: PacketType, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            size: super::codec::size_for_body(body.len()),
            id,
            packet_type,
            body,
        }
    }

    /// Size field value: id + type + body + 2 terminators
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Total number of bytes on the wire, size field included
    pub fn encoded_len(&self) -> usize {
        super::codec::SIZE_FIELD_LEN + super::codec::HEADER_AND_TERMINATORS + self.body.len()
    }

    /// Body as display text, colour escapes removed
    pub fn body_text(&self) -> std::result::Result<String, text::TextDecodeError> {
        text::decode_text(&self.body)
    }
}
