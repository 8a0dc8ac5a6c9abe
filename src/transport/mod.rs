//! Transport Module
//!
//! Pluggable byte streams underneath the protocol layer.
//!
//! ## Architecture
//! - `Transport` dials an address and hands back a `Connection`
//! - `TcpTransport` is the default
//! - `ChunkedTransport` moves one byte per read/write call, for conformance testing
//!
//! The protocol layer only ever talks to a `Connection` through `read_full`
//! and `write_full`, so any stream that makes partial progress works.

use std::fmt;
use std::io::{self, ErrorKind, Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{OtterError, Result};

mod chunked;
mod tcp;


pub use chunked::{ChunkedConnection, ChunkedTransport};
pub use tcp::TcpTransport;

/// A connected bidirectional byte stream
///
/// `read` and `write` may move fewer bytes than asked for. A `read` returning
/// 0 for a non-empty buffer means the peer closed the stream.
pub trait Connection: Read + Write + Send {
    /// Set the read timeout (`None` blocks forever)
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;

    /// Set the write timeout (`None` blocks forever)
    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;

    /// Close both directions of the stream
    fn shutdown(&self) -> io::Result<()>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

/// Dials connections
pub trait Transport: fmt::Debug + Send + Sync {
    fn dial(&self, addr: &str) -> io::Result<Box<dyn Connection>>;
}

/// Fill `buf` completely, retrying on partial reads
///
/// EOF before `buf` is full is reported as `Truncated`.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(OtterError::Truncated {
                    expected: buf.len(),
                    received: filled,
                })
            }
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Write all of `buf`, retrying on partial writes
///
/// Fails only on a transport error or a write that makes no progress.
pub fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(OtterError::Io(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("wrote {} of {} bytes", written, buf.len()),
                )))
            }
            Ok(n) => written += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
