//! Configuration for mcrcon
//!
//! Resolved once (defaults, then environment, then command line) and passed
//! by reference into the client. Nothing here is mutated after `build()`.

use std::fmt;

use crate::error::{RconError, Result};

/// Environment variable holding the server host
pub const ENV_HOST: &str = "MCRCON_HOST";
/// Environment variable holding the server port
pub const ENV_PORT: &str = "MCRCON_PORT";
/// Environment variable holding the RCON password
pub const ENV_PASS: &str = "MCRCON_PASS";
/// Environment variable enabling the config echo (only the value `yes`)
pub const ENV_VERBOSE: &str = "MCRCON_VERBOSE";

/// Default RCON port
pub const DEFAULT_PORT: u16 = 25575;

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server RCON port
    pub port: u16,

    /// RCON password sent in the AUTH packet
    pub password: String,

    // -------------------------------------------------------------------------
    // Request
    // -------------------------------------------------------------------------
    /// Command text, words joined by single spaces
    pub command: String,

    /// Echo the resolved configuration before connecting
    pub verbose: bool,

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------
    /// Read timeout (milliseconds, 0 blocks forever)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 blocks forever)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
            command: String::new(),
            verbose: false,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as used for connecting and in error messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings no server could be reached with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RconError::Config("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(RconError::Config("port must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Values given on the command line. `None` and empty leave the layer below.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,

    /// Only ever turns the echo on
    pub verbose: bool,

    /// Applied to both read and write
    pub timeout_ms: Option<u64>,

    /// Command words, joined by single spaces
    pub command: Vec<String>,
}

/// The verbose echo. Lists the password in clear, as the operator asked for it.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Host: {}", self.host)?;
        writeln!(f, "Port: {}", self.port)?;
        writeln!(f, "Password: {}", self.password)?;
        write!(f, "Command: {}", self.command)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Layer environment values from `lookup` on top of the current values
    ///
    /// A port that does not parse is logged and ignored.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.config.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.config.port = port,
                Err(e) => tracing::warn!("Ignoring {}={:?}: {}", ENV_PORT, port, e),
            }
        }

        if let Some(password) = lookup(ENV_PASS) {
            self.config.password = password;
        }

        if let Some(verbose) = lookup(ENV_VERBOSE) {
            self.config.verbose = verbose == "yes";
        }

        self
    }

    /// Layer command-line values on top of the current values
    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.config.host = host;
        }
        if let Some(port) = overrides.port {
            self.config.port = port;
        }
        if let Some(password) = overrides.password {
            self.config.password = password;
        }
        if overrides.verbose {
            self.config.verbose = true;
        }
        if let Some(ms) = overrides.timeout_ms {
            self.config.read_timeout_ms = ms;
            self.config.write_timeout_ms = ms;
        }
        if !overrides.command.is_empty() {
            self = self.command_words(&overrides.command);
        }
        self
    }

    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the command from its words, joined by single spaces
    pub fn command_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.command = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self
    }

    /// Set the command text verbatim
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.config.command = command.into();
        self
    }

    /// Enable or disable the config echo
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate
    pub fn try_build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
