//! Client Session
//!
//! One connection plus one fixed-capacity receive buffer.
//!
//! ## Request Cycle
//! Every call runs the same exchange:
//! 1. Build the frame (header first, with the precomputed payload size)
//! 2. Flush it, looping over partial writes
//! 3. Read exactly one 8 byte header
//! 4. Check message type, version and that the payload fits the buffer
//! 5. Read exactly `payload_size` bytes
//! 6. Decode the payload for the call
//!
//! Responses are matched to requests purely by order on the wire, so a
//! session handles one call at a time (`&mut self`). After a fatal error the
//! stream position is unknown and the session refuses further calls until
//! `reconnect` succeeds.

use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::{OtterError, Result};
use crate::protocol::{
    Header, MessageType, PayloadParser, RequestBuilder, StatusCode, HEADER_SIZE,
    MAX_KEY_SIZE, MAX_PAYLOAD_SIZE, MAX_VALUE_SIZE, PROTOCOL_VERSION, U32_SIZE, U64_SIZE,
};
use crate::transport::{read_full, Connection};

/// A client session with an Otter server
pub struct Client {
    /// Open connection to the server
    conn: Box<dyn Connection>,

    /// Receive buffer, reused by every call; never resized
    buf: Vec<u8>,

    config: Config,

    /// Set after a fatal error; cleared by `reconnect`
    broken: bool,
}

impl Client {
    /// Connect to `addr` over TCP with default settings
    pub fn connect(addr: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::builder().addr(addr).build())
    }

    /// Connect using the address and transport from `config`
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let conn = dial(&config)?;

        tracing::debug!(
            "Session opened to {} (buffer {} bytes)",
            config.addr,
            config.recv_buffer_size
        );

        Ok(Self {
            conn,
            buf: vec![0u8; config.recv_buffer_size],
            config,
            broken: false,
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Get the value stored under `key`
    ///
    /// A missing key is `OtterError::NotFound`.
    pub fn get(&mut self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let key = key.as_ref();
        check_key(key)?;

        let header = Header::new(MessageType::Get, payload_size(&[U32_SIZE, key.len()])?);
        let len = self.exchange("get", header, MessageType::Data, |builder| {
            builder.write_string(key);
        })?;

        let mut parser = PayloadParser::new(&self.buf[..len]);
        let status = parser
            .read_u16()
            .ok_or_else(|| malformed("get", "missing status code"))?;
        match StatusCode::from(status) {
            StatusCode::Ok => {}
            StatusCode::NotFound => return Err(OtterError::NotFound),
            StatusCode::Other(code) => return Err(OtterError::Status(code)),
        }

        let value = parser
            .read_string()
            .ok_or_else(|| malformed("get", "value shorter than declared"))?;
        Ok(value.to_vec())
    }

    /// Store `value` under `key`
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        let (key, value) = (key.as_ref(), value.as_ref());
        check_key(key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(OtterError::InvalidRequest(format!(
                "value of {} bytes exceeds limit of {}",
                value.len(),
                MAX_VALUE_SIZE
            )));
        }

        let size = payload_size(&[U32_SIZE, key.len(), U32_SIZE, value.len()])?;
        let len = self.exchange("put", Header::new(MessageType::Put, size), MessageType::Ack, |builder| {
            builder.write_string(key);
            builder.write_string(value);
        })?;

        self.read_ack("put", len)
    }

    /// Delete `key`
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<()> {
        let key = key.as_ref();
        check_key(key)?;

        let header = Header::new(MessageType::Delete, payload_size(&[U32_SIZE, key.len()])?);
        let len = self.exchange("delete", header, MessageType::Ack, |builder| {
            builder.write_string(key);
        })?;

        self.read_ack("delete", len)
    }

    /// Round-trip a timestamp through the server
    ///
    /// Returns the elapsed milliseconds between sending and receiving.
    pub fn ping(&mut self) -> Result<i64> {
        let sent = now_millis();
        let header = Header::new(MessageType::Echo, U64_SIZE as u32);
        let len = self.exchange("ping", header, MessageType::Echo, |builder| {
            builder.write_u64(sent);
        })?;

        let echoed = PayloadParser::new(&self.buf[..len])
            .read_u64()
            .ok_or_else(|| malformed("ping", "missing timestamp"))?;

        // Two's complement keeps the sign if the echoed stamp is ahead of us
        Ok(now_millis().wrapping_sub(echoed) as i64)
    }

    /// Send `message` and check the server returns it unchanged
    pub fn echo(&mut self, message: &[u8]) -> Result<()> {
        let header = Header::new(MessageType::Echo, payload_size(&[message.len()])?);
        let len = self.exchange("echo", header, MessageType::Echo, |builder| {
            builder.write_raw_bytes(message);
        })?;

        if &self.buf[..len] != message {
            return Err(OtterError::EchoMismatch {
                sent: message.len(),
                received: len,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Drop the current connection and dial a new one
    pub fn reconnect(&mut self) -> Result<()> {
        if let Err(e) = self.conn.shutdown() {
            tracing::debug!("Shutdown before reconnect failed: {}", e);
        }
        // Stays broken if the dial fails
        self.broken = true;
        self.conn = dial(&self.config)?;
        self.broken = false;

        tracing::debug!("Reconnected to {}", self.config.addr);
        Ok(())
    }

    /// Close the connection
    pub fn close(self) -> Result<()> {
        self.conn.shutdown()?;
        Ok(())
    }

    /// Whether a fatal error has made the connection unusable
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn addr(&self) -> &str {
        &self.config.addr
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.conn.peer_addr()?)
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.conn.set_read_timeout(timeout)?;
        Ok(())
    }

    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.conn.set_write_timeout(timeout)?;
        Ok(())
    }

    // =========================================================================
    // Exchange
    // =========================================================================

    /// Run one request/response exchange
    ///
    /// Returns the payload length; the payload sits at the front of `buf`.
    fn exchange<F>(
        &mut self,
        op: &'static str,
        request: Header,
        expected: MessageType,
        write_payload: F,
    ) -> Result<usize>
    where
        F: FnOnce(&mut RequestBuilder<'_, dyn Connection>),
    {
        if self.broken {
            return Err(OtterError::ConnectionBroken);
        }

        let result = self.round_trip(request, expected, write_payload);
        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!("{}: connection to {} is broken: {}", op, self.config.addr, e);
                self.broken = true;
            }
        }
        result
    }

    fn round_trip<F>(&mut self, request: Header, expected: MessageType, write_payload: F) -> Result<usize>
    where
        F: FnOnce(&mut RequestBuilder<'_, dyn Connection>),
    {
        let mut builder = RequestBuilder::new(&mut *self.conn);
        builder.write_header(request);
        write_payload(&mut builder);
        builder.flush()?;

        tracing::debug!(
            message_type = %request.message_type,
            payload_size = request.payload_size,
            "sent request"
        );

        let mut head = [0u8; HEADER_SIZE];
        read_full(&mut *self.conn, &mut head)?;
        let header = Header::decode(&head);

        if header.message_type != expected {
            return Err(OtterError::UnexpectedMessageType {
                expected,
                actual: header.message_type,
            });
        }
        if header.version != PROTOCOL_VERSION {
            return Err(OtterError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                actual: header.version,
            });
        }

        let size = header.payload_size as usize;
        if size > self.buf.len() {
            return Err(OtterError::PayloadTooLarge {
                size: header.payload_size,
                capacity: self.buf.len(),
            });
        }

        read_full(&mut *self.conn, &mut self.buf[..size])?;

        tracing::debug!(
            message_type = %header.message_type,
            payload_size = header.payload_size,
            "received response"
        );
        Ok(size)
    }

    /// Decode an Ack payload: a status code
    fn read_ack(&self, op: &'static str, len: usize) -> Result<()> {
        let status = PayloadParser::new(&self.buf[..len])
            .read_u16()
            .ok_or_else(|| malformed(op, "missing status code"))?;
        match StatusCode::from(status) {
            StatusCode::Ok => Ok(()),
            other => Err(OtterError::Status(other.into())),
        }
    }
}

fn dial(config: &Config) -> Result<Box<dyn Connection>> {
    let conn = config
        .transport
        .dial(&config.addr)
        .map_err(|source| OtterError::Dial {
            addr: config.addr.clone(),
            source,
        })?;
    conn.set_read_timeout(config.read_timeout())?;
    conn.set_write_timeout(config.write_timeout())?;
    Ok(conn)
}

/// Sum payload field sizes, rejecting frames the server would refuse
fn payload_size(parts: &[usize]) -> Result<u32> {
    let total = parts.iter().try_fold(0usize, |acc, n| acc.checked_add(*n));
    match total {
        Some(total) if total <= MAX_PAYLOAD_SIZE => Ok(total as u32),
        _ => Err(OtterError::InvalidRequest(format!(
            "payload exceeds limit of {} bytes",
            MAX_PAYLOAD_SIZE
        ))),
    }
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.len() > MAX_KEY_SIZE {
        return Err(OtterError::InvalidRequest(format!(
            "key of {} bytes exceeds limit of {}",
            key.len(),
            MAX_KEY_SIZE
        )));
    }
    Ok(())
}

fn malformed(op: &str, what: &str) -> OtterError {
    OtterError::Malformed(format!("{}: {}", op, what))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
