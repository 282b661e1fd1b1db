//! Connection Handle
//!
//! Owns the TCP socket to one RCON server.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::config::Config;
use crate::error::{RconError, Result};

/// A connected TCP stream split into buffered halves
///
/// Fields drop in declaration order: writer (flushing), reader, then socket.
pub struct Connection {
    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// The socket itself
    socket: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the server named in `config` and apply its timeouts
    pub fn connect(config: &Config) -> Result<Self> {
        let stream = TcpStream::connect((config.host.as_str(), config.port)).map_err(|e| {
            RconError::Connection {
                addr: config.addr(),
                source: e,
            }
        })?;

        let mut connection = Self::new(stream)?;
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }

    /// Wrap an already connected stream
    pub fn new(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // One request in flight, send it now
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        Ok(Self {
            writer: BufWriter::new(write_stream),
            reader: BufReader::new(read_stream),
            socket: stream,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves that direction blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.socket
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.socket
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Flush pending output and shut the socket down
    pub fn close(mut self) -> Result<()> {
        let flushed = self.writer.flush();

        match self.socket.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!("Closed connection to {}", self.peer_addr);
        flushed.map_err(RconError::from)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
