//! Error types for mcrcon
//!
//! Provides a unified error type for all fatal session failures.
//! Body text decoding has its own error (see [`crate::protocol::TextDecodeError`])
//! because it never aborts a session.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for mcrcon operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("{source} Host: {addr}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Structural error: {0}")]
    Structural(String),

    // -------------------------------------------------------------------------
    // Protocol Exchange Errors
    // -------------------------------------------------------------------------
    #[error("Authentication rejected (response id {id})")]
    AuthRejected { id: i32 },

    #[error("Unexpected packet type {packet_type} in response to {phase}")]
    UnexpectedResponse { phase: &'static str, packet_type: i32 },

    #[error("Request body of {len} bytes exceeds maximum of {max}")]
    RequestTooLarge { len: usize, max: usize },

    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of an [`RconError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport could not be established or used
    Connection,
    /// Stream ended in the middle of a frame
    Transport,
    /// Frame bytes violate packet invariants
    Structural,
    /// Well-formed packets, wrong exchange
    Protocol,
    Config,
}

impl RconError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RconError::Connection { .. } | RconError::Io(_) => ErrorKind::Connection,
            RconError::Transport(_) => ErrorKind::Transport,
            RconError::Structural(_) => ErrorKind::Structural,
            RconError::AuthRejected { .. }
            | RconError::UnexpectedResponse { .. }
            | RconError::RequestTooLarge { .. }
            | RconError::InvalidState { .. } => ErrorKind::Protocol,
            RconError::Config(_) => ErrorKind::Config,
        }
    }
}
