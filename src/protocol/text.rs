//! Body text rendering
//!
//! Servers embed colour codes as a fixed 3-byte sequence starting with 0xC2.
//! They are stripped before the body is read as UTF-8.

use std::str::Utf8Error;

use thiserror::Error;

/// First byte of a colour escape
pub const COLOR_ESCAPE: u8 = 0xC2;

/// Bytes dropped per colour escape, lead byte included
pub const COLOR_ESCAPE_LEN: usize = 3;

/// Body was not valid UTF-8 after filtering. Not fatal to a session.
#[derive(Debug, Error)]
#[error("Could not decode body as UTF-8: {source}")]
pub struct TextDecodeError {
    #[source]
    pub source: Utf8Error,

    /// Body as received, before filtering
    pub raw: Vec<u8>,
}

/// Drop every colour escape, keeping all other bytes in order
pub fn filter_color_bytes(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] == COLOR_ESCAPE {
            i += COLOR_ESCAPE_LEN;
        } else {
            output.push(input[i]);
            i += 1;
        }
    }

    output
}

/// Filter colour escapes and decode the rest as UTF-8
pub fn decode_text(body: &[u8]) -> Result<String, TextDecodeError> {
    let filtered = filter_color_bytes(body);
    String::from_utf8(filtered).map_err(|e| TextDecodeError {
        source: e.utf8_error(),
        raw: body.to_vec(),
    })
}

/// Display form of a body: its text, or a byte listing if it is not UTF-8
pub fn render(body: &[u8]) -> String {
    match decode_text(body) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{}", e);
            raw_diagnostic(&e.raw)
        }
    }
}

/// `Could not decode body(UTF-8) [..]` with bytes listed as signed decimals
pub fn raw_diagnostic(body: &[u8]) -> String {
    let bytes: Vec<String> = body.iter().map(|&b| (b as i8).to_string()).collect();
    format!("Could not decode body(UTF-8) [{}]", bytes.join(", "))
}

/// Lowercase hex, space separated
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
