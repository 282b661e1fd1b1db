//! Protocol Module
//!
//! Defines the Source RCON wire protocol.
//!
//! ## Packet Format
//! ```text
//! offset  size  field
//! 0       4     size  (= 10 + len(body), excludes itself)
//! 4       4     id
//! 8       4     type
//! 12      N     body
//! 12+N    1     body terminator (0x00)
//! 13+N    1     packet terminator (0x00)
//! ```
//!
//! ### Packet Types
//! - 3: AUTH            (request)
//! - 2: EXEC_COMMAND    (request)
//! - 2: AUTH_RESPONSE   (response)
//! - 0: RESPONSE_VALUE  (response)
//!
//! ### Exchange
//! 1. AUTH with the password, answered by AUTH_RESPONSE
//! 2. EXEC_COMMAND with the command text, answered by RESPONSE_VALUE

mod packet;
mod codec;
mod text;

pub use packet::{Packet, PacketType};
pub use codec::{
    decode, encode, encode_packet, read_packet, size_for_body, write_packet,
    MAX_BODY_LEN, MAX_PACKET_SIZE, MIN_PACKET_SIZE, SIZE_FIELD_LEN,
};
pub use text::{
    decode_text, filter_color_bytes, hex_dump, raw_diagnostic, render, TextDecodeError,
    COLOR_ESCAPE, COLOR_ESCAPE_LEN,
};
