//! Byte-at-a-time transport
//!
//! Wraps another transport so that every read returns at most one byte and
//! every write accepts at most one byte. Running the client over it shows the
//! protocol layer does not depend on how the stream fragments.

use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use super::{Connection, TcpTransport, Transport};

#[derive(Debug, Clone)]
pub struct ChunkedTransport {
    inner: Arc<dyn Transport>,
}

impl ChunkedTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }
}

impl Default for ChunkedTransport {
    fn default() -> Self {
        Self::new(Arc::new(TcpTransport::default()))
    }
}

impl Transport for ChunkedTransport {
    fn dial(&self, addr: &str) -> io::Result<Box<dyn Connection>> {
        let inner = self.inner.dial(addr)?;
        tracing::debug!("Connected to {} via chunked transport", addr);
        Ok(Box::new(ChunkedConnection { inner }))
    }
}

/// Connection moving a single byte per call
pub struct ChunkedConnection {
    inner: Box<dyn Connection>,
}

impl ChunkedConnection {
    pub fn new(inner: Box<dyn Connection>) -> Self {
        Self { inner }
    }
}

impl Read for ChunkedConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.inner.read(&mut buf[..1])
    }
}

impl Write for ChunkedConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.inner.write(&buf[..1])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Connection for ChunkedConnection {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.inner.set_read_timeout(timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.inner.set_write_timeout(timeout)
    }

    fn shutdown(&self) -> io::Result<()> {
        self.inner.shutdown()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.inner.peer_addr()
    }
}
