//! # mcrcon
//!
//! A client for the Source RCON protocol:
//! - Little-endian packet framing with null terminators
//! - Password authentication followed by one console command
//! - Colour-code filtering of the server's reply
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CLI (mcrcon)                           │
//! │               env + flags ──▶ Config                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   client::run                                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Session   │─────────▶│   Codec     │
//!   │ (AUTH, EXEC)│          │  (Packet)   │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Connection  │
//!   │   (TCP)     │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, RconError, Result};
pub use config::Config;
pub use network::{CommandOutput, Session};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mcrcon
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
