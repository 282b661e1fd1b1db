//! RCON Session
//!
//! Drives the two-phase exchange over one stream: authenticate, then run a
//! single command.
//!
//! ## States
//! ```text
//! Connected ──auth──▶ Authenticated ──send──▶ CommandSent ──recv──▶ Completed
//!     │                    │                       │
//!     └────────────────────┴───────────────────────┴──▶ Failed
//! ```
//!
//! The response type value 2 is read as AUTH_RESPONSE only because it answers
//! an AUTH request. It is never matched on its own.

use std::fmt;
use std::io::{Read, Write};

use crate::error::{RconError, Result};
use crate::protocol::{
    filter_color_bytes, hex_dump, read_packet, render, write_packet, Packet, PacketType,
    TextDecodeError, MAX_BODY_LEN,
};

/// Request id sent with every client packet
pub const RCON_PID: i32 = 0x0BADC0DE;

/// Id a server answers AUTH with when the password is wrong
pub const AUTH_FAILED_ID: i32 = -1;

/// Where a session is in the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Authenticated,
    CommandSent,
    Completed,
    Failed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Connected => "connected",
            SessionState::Authenticated => "authenticated",
            SessionState::CommandSent => "waiting for a response",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to an executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    packet: Packet,
}

impl CommandOutput {
    /// The raw response packet
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    /// Filtered body text
    pub fn text(&self) -> std::result::Result<String, TextDecodeError> {
        self.packet.body_text()
    }

    /// Filtered body text, or a byte listing when it is not UTF-8
    pub fn render(&self) -> String {
        render(&self.packet.body)
    }

    /// Filtered body as lowercase hex, for bodies that do not render
    pub fn hex(&self) -> String {
        hex_dump(&filter_color_bytes(&self.packet.body))
    }
}

/// One authenticate-then-execute exchange over `S`
pub struct Session<S> {
    stream: S,
    state: SessionState,
    request_id: i32,
}

impl<S: Read + Write> Session<S> {
    /// Start a session on a connected stream
    pub fn new(stream: S) -> Self {
        Self::with_request_id(stream, RCON_PID)
    }

    /// Start a session that tags requests with `request_id`
    pub fn with_request_id(stream: S, request_id: i32) -> Self {
        Self {
            stream,
            state: SessionState::Connected,
            request_id,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Authenticate with `password`
    ///
    /// Succeeds only on an AUTH_RESPONSE carrying our request id.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        self.expect_state(SessionState::Connected, "authenticate")?;

        if let Err(e) = check_body_len(password) {
            return self.fail(e);
        }

        let request = Packet::new(self.request_id, PacketType::AUTH, password.as_bytes());
        let response = match self.round_trip(&request) {
            Ok(packet) => packet,
            Err(e) => return self.fail(e),
        };

        if response.packet_type != PacketType::AUTH_RESPONSE {
            return self.fail(RconError::UnexpectedResponse {
                phase: "AUTH",
                packet_type: response.packet_type.value(),
            });
        }

        if response.id != self.request_id {
            if response.id != AUTH_FAILED_ID {
                tracing::warn!(
                    "AUTH_RESPONSE id {:#x} does not match request id {:#x}",
                    response.id,
                    self.request_id
                );
            }
            return self.fail(RconError::AuthRejected { id: response.id });
        }

        tracing::info!("Authenticated");
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Run `command` and return the single response packet
    ///
    /// Responses split over several packets are not reassembled; only the
    /// first one is read.
    pub fn execute(&mut self, command: &str) -> Result<CommandOutput> {
        self.expect_state(SessionState::Authenticated, "execute a command")?;

        if let Err(e) = check_body_len(command) {
            return self.fail(e);
        }

        let request = Packet::new(self.request_id, PacketType::EXEC_COMMAND, command.as_bytes());
        if let Err(e) = self.send(&request) {
            return self.fail(e);
        }
        self.state = SessionState::CommandSent;

        let response = match self.receive() {
            Ok(packet) => packet,
            Err(e) => return self.fail(e),
        };

        if response.packet_type != PacketType::RESPONSE_VALUE {
            tracing::debug!(
                "EXEC_COMMAND answered with packet type {}",
                response.packet_type
            );
        }

        self.state = SessionState::Completed;
        Ok(CommandOutput { packet: response })
    }

    /// Give the stream back, e.g. to close it
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn round_trip(&mut self, request: &Packet) -> Result<Packet> {
        self.send(request)?;
        self.receive()
    }

    fn send(&mut self, packet: &Packet) -> Result<()> {
        tracing::debug!(
            "Sending packet id={:#x} type={} size={}",
            packet.id,
            packet.packet_type,
            packet.size()
        );
        write_packet(&mut self.stream, packet)
    }

    fn receive(&mut self) -> Result<Packet> {
        let packet = read_packet(&mut self.stream)?;
        tracing::debug!(
            "Received packet id={:#x} type={} size={}",
            packet.id,
            packet.packet_type,
            packet.size()
        );
        Ok(packet)
    }

    fn expect_state(&self, expected: SessionState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RconError::InvalidState {
                operation,
                state: self.state.as_str(),
            })
        }
    }

    fn fail<T>(&mut self, error: RconError) -> Result<T> {
        self.state = SessionState::Failed;
        Err(error)
    }
}

fn check_body_len(body: &str) -> Result<()> {
    if body.len() > MAX_BODY_LEN {
        return Err(RconError::RequestTooLarge {
            len: body.len(),
            max: MAX_BODY_LEN,
        });
    }
    Ok(())
}
