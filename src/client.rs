//! Client Module
//!
//! The single operation the binary performs: connect, authenticate, run one
//! command, disconnect.

use crate::config::Config;
use crate::error::Result;
use crate::network::{CommandOutput, Connection, Session};

/// Run `config.command` on the server described by `config`
///
/// The connection is closed on every path. A failure to close is logged and
/// does not replace the outcome of the exchange.
pub fn run(config: &Config) -> Result<CommandOutput> {
    config.validate()?;

    let connection = Connection::connect(config)?;
    tracing::info!("Connected {}", connection.peer_addr());

    let mut session = Session::new(connection);
    let outcome = session
        .authenticate(&config.password)
        .and_then(|()| session.execute(&config.command));

    let state = session.state();
    if let Err(e) = session.into_inner().close() {
        tracing::warn!("Error closing connection ({}): {}", state, e);
    }

    outcome
}
