//! TCP transport
//!
//! Direct stream connections; the default transport.

use std::io::{self, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{Connection, Transport};

/// Dials plain TCP connections
#[derive(Debug, Clone)]
pub struct TcpTransport {
    /// Disable Nagle's algorithm on new connections
    pub nodelay: bool,

    /// Bound on how long a dial may take (`None` uses the OS default)
    pub connect_timeout: Option<Duration>,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self {
            nodelay: true,
            connect_timeout: None,
        }
    }
}

impl TcpTransport {
    fn connect(&self, addr: &str) -> io::Result<TcpStream> {
        let timeout = match self.connect_timeout {
            Some(timeout) => timeout,
            None => return TcpStream::connect(addr),
        };

        // connect_timeout takes a single address, so try each resolved one
        let mut last_err = None;
        for sock_addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&sock_addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(ErrorKind::InvalidInput, "address resolved to nothing")
        }))
    }
}

impl Transport for TcpTransport {
    fn dial(&self, addr: &str) -> io::Result<Box<dyn Connection>> {
        let stream = self.connect(addr)?;
        stream.set_nodelay(self.nodelay)?;

        tracing::debug!("Connected to {} via tcp", addr);
        Ok(Box::new(stream))
    }
}

impl Connection for TcpStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }

    fn shutdown(&self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            // Peer already went away
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }
}
