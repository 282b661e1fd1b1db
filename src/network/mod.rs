//! Network Module
//!
//! TCP connection and RCON session handling.
//!
//! ## Architecture
//! - One blocking TCP connection per invocation
//! - One request in flight at a time
//! - Session drives AUTH, then EXEC_COMMAND

mod connection;
mod session;

pub use connection::Connection;
pub use session::{CommandOutput, Session, SessionState, AUTH_FAILED_ID, RCON_PID};
