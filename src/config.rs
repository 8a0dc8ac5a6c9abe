//! Configuration for the Otter client
//!
//! Centralized configuration with sensible defaults.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{OtterError, Result};
use crate::protocol::HEADER_SIZE;
use crate::transport::{TcpTransport, Transport};

/// Client session configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub addr: String,

    /// Dials connections; swap in a `ChunkedTransport` or a test double here
    pub transport: Arc<dyn Transport>,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the receive buffer. Responses with a larger payload are
    /// rejected; the buffer never grows.
    pub recv_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8119".to_string(),
            transport: Arc::new(TcpTransport::default()),
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            recv_buffer_size: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.addr.is_empty() {
            return Err(OtterError::Config("address must not be empty".to_string()));
        }
        if self.recv_buffer_size < HEADER_SIZE {
            return Err(OtterError::Config(format!(
                "receive buffer of {} bytes cannot hold a {} byte header",
                self.recv_buffer_size, HEADER_SIZE
            )));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.write_timeout_ms)
    }
}

fn timeout_from_ms(ms: u64) -> Option<Duration> {
    if ms == 0 {
        None
    } else {
        Some(Duration::from_millis(ms))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the transport used to dial the server
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = transport;
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

    /// Set the receive buffer capacity (in bytes)
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.config.recv_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
