//! Tests for the RCON session
//!
//! These tests verify:
//! - The AUTH then EXEC_COMMAND exchange and the bytes it sends
//! - Authentication decisions
//! - State transitions and failure handling

use std::io::{self, Cursor, Read, Write};
use mcrcon::network::{Session, SessionState, AUTH_FAILED_ID, RCON_PID};
use mcrcon::protocol::{encode, read_packet, PacketType, MAX_BODY_LEN};
use mcrcon::{ErrorKind, RconError};

// =============================================================================
// Helper Functions
// =============================================================================

/// Replays scripted server bytes and records what the client writes
struct FakeStream {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl FakeStream {
    fn new(server_bytes: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(server_bytes),
            output: Vec::new(),
        }
    }
}

impl Read for FakeStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for FakeStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes always fail, as on a reset connection
struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::ConnectionReset))
    }
}

impl Write for BrokenStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::ConnectionReset))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn script(packets: &[(i32, PacketType, &str)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (id, packet_type, body) in packets {
        bytes.extend_from_slice(&encode(*id, *packet_type, body.as_bytes()));
    }
    bytes
}

// =============================================================================
// Exchange Tests
// =============================================================================

#[test]
fn test_auth_then_exec() {
    let server = script(&[
        (RCON_PID, PacketType::AUTH_RESPONSE, ""),
        (RCON_PID, PacketType::RESPONSE_VALUE, "HLSW : Test.\n"),
    ]);
    let mut session = Session::new(FakeStream::new(server));

    session.authenticate("test").unwrap();
    assert_eq!(session.state(), SessionState::Authenticated);

    let output = session.execute("echo HLSW: Test.").unwrap();
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(output.render(), "HLSW : Test.\n");
    assert_eq!(output.text().unwrap(), "HLSW : Test.\n");
    assert_eq!(output.packet().packet_type, PacketType::RESPONSE_VALUE);
}

#[test]
fn test_requests_written_in_order() {
    let server = script(&[
        (RCON_PID, PacketType::AUTH_RESPONSE, ""),
        (RCON_PID, PacketType::RESPONSE_VALUE, ""),
    ]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("test").unwrap();
    session.execute("list").unwrap();

    let sent = session.into_inner().output;
    let mut expected = encode(RCON_PID, PacketType::AUTH, b"test").to_vec();
    expected.extend_from_slice(&encode(RCON_PID, PacketType::EXEC_COMMAND, b"list"));
    assert_eq!(sent, expected);

    let mut reader = Cursor::new(sent);
    let auth = read_packet(&mut reader).unwrap();
    let exec = read_packet(&mut reader).unwrap();
    assert_eq!(auth.packet_type, PacketType::AUTH);
    assert_eq!(exec.packet_type, PacketType::EXEC_COMMAND);
    assert_eq!(exec.id, RCON_PID);
}

#[test]
fn test_response_colour_codes_filtered() {
    let server = script(&[
        (RCON_PID, PacketType::AUTH_RESPONSE, ""),
        (RCON_PID, PacketType::RESPONSE_VALUE, "\u{a7}eThere are 2 players"),
    ]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let output = session.execute("list").unwrap();
    assert_eq!(output.render(), "There are 2 players");
}

#[test]
fn test_hex_of_filtered_body() {
    let mut server = script(&[(RCON_PID, PacketType::AUTH_RESPONSE, "")]);
    server.extend_from_slice(&encode(
        RCON_PID,
        PacketType::RESPONSE_VALUE,
        &[0x41, 0xC2, 0x99, 0x02, 0x42, 0xFF],
    ));
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let output = session.execute("list").unwrap();
    assert_eq!(output.hex(), "41 42 ff");
    assert!(output.text().is_err());
    assert_eq!(output.render(), "Could not decode body(UTF-8) [65, -62, -103, 2, 66, -1]");
}

#[test]
fn test_custom_request_id() {
    let server = script(&[(42, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::with_request_id(FakeStream::new(server), 42);

    session.authenticate("pw").unwrap();

    let sent = session.into_inner().output;
    assert_eq!(&sent[4..8], &42i32.to_le_bytes());
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_auth_rejected_with_failure_id() {
    let server = script(&[(AUTH_FAILED_ID, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));

    let err = session.authenticate("wrong").unwrap_err();
    assert!(matches!(err, RconError::AuthRejected { id: -1 }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn test_auth_rejected_with_mismatched_id() {
    let server = script(&[(7, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));

    let err = session.authenticate("pw").unwrap_err();
    assert!(matches!(err, RconError::AuthRejected { id: 7 }));
}

#[test]
fn test_auth_unexpected_response_type() {
    let server = script(&[(RCON_PID, PacketType::RESPONSE_VALUE, "")]);
    let mut session = Session::new(FakeStream::new(server));

    let err = session.authenticate("pw").unwrap_err();
    assert!(matches!(
        err,
        RconError::UnexpectedResponse {
            phase: "AUTH",
            packet_type: 0
        }
    ));
    assert_eq!(session.state(), SessionState::Failed);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_short_read_during_auth() {
    let mut session = Session::new(FakeStream::new(vec![0x0A, 0x00, 0x00]));

    let err = session.authenticate("pw").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn test_server_closes_before_command_response() {
    let server = script(&[(RCON_PID, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let err = session.execute("list").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn test_corrupt_command_response() {
    let mut server = script(&[
        (RCON_PID, PacketType::AUTH_RESPONSE, ""),
        (RCON_PID, PacketType::RESPONSE_VALUE, "x"),
    ]);
    let last = server.len() - 2;
    server[last] = 0xFF;

    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let err = session.execute("list").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_oversized_command_not_sent() {
    let server = script(&[(RCON_PID, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let command = "x".repeat(MAX_BODY_LEN + 1);
    let err = session.execute(&command).unwrap_err();
    assert!(matches!(err, RconError::RequestTooLarge { .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(session.state(), SessionState::Failed);

    let sent = session.into_inner().output;
    assert_eq!(sent, encode(RCON_PID, PacketType::AUTH, b"pw").to_vec());
}

#[test]
fn test_write_failure_is_connection_error() {
    let mut session = Session::new(BrokenStream);

    let err = session.authenticate("pw").unwrap_err();
    assert!(matches!(err, RconError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert_eq!(session.state(), SessionState::Failed);
}

// =============================================================================
// State Tests
// =============================================================================

#[test]
fn test_execute_before_authenticate() {
    let mut session = Session::new(FakeStream::new(Vec::new()));

    let err = session.execute("list").unwrap_err();
    assert!(matches!(err, RconError::InvalidState { .. }));
    assert_eq!(session.state(), SessionState::Connected);
    assert!(session.into_inner().output.is_empty());
}

#[test]
fn test_authenticate_twice() {
    let server = script(&[(RCON_PID, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();

    let err = session.authenticate("pw").unwrap_err();
    assert!(matches!(err, RconError::InvalidState { .. }));
}

#[test]
fn test_no_execute_after_failure() {
    let server = script(&[(AUTH_FAILED_ID, PacketType::AUTH_RESPONSE, "")]);
    let mut session = Session::new(FakeStream::new(server));
    let _ = session.authenticate("wrong");

    let err = session.execute("stop").unwrap_err();
    assert!(matches!(err, RconError::InvalidState { state: "failed", .. }));
}

#[test]
fn test_single_command_per_session() {
    let server = script(&[
        (RCON_PID, PacketType::AUTH_RESPONSE, ""),
        (RCON_PID, PacketType::RESPONSE_VALUE, "one"),
        (RCON_PID, PacketType::RESPONSE_VALUE, "two"),
    ]);
    let mut session = Session::new(FakeStream::new(server));
    session.authenticate("pw").unwrap();
    session.execute("first").unwrap();

    let err = session.execute("second").unwrap_err();
    assert!(matches!(err, RconError::InvalidState { state: "completed", .. }));
}
