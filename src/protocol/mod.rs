//! Protocol Module
//!
//! Defines the binary wire protocol spoken with the Otter server.
//!
//! ## Frame Format
//!
//! Every frame is a fixed 8 byte header followed by `payload_size` bytes.
//! All integers are big-endian (network byte order).
//!
//! ```text
//! ┌──────────────┬─────────────┬──────────────────┬─────────────────────┐
//! │ MsgType (2)  │ Version (2) │ PayloadSize (4)  │       Payload       │
//! └──────────────┴─────────────┴──────────────────┴─────────────────────┘
//! ```
//!
//! Strings are encoded as `length (4) + bytes`, with no terminator.
//!
//! ### Payloads
//! | Request | Request payload      | Response                         |
//! |---------|----------------------|----------------------------------|
//! | GET     | key                  | DATA: status (2) [+ value if OK] |
//! | PUT     | key + value          | ACK:  status (2)                 |
//! | DELETE  | key                  | ACK:  status (2)                 |
//! | ECHO    | raw bytes            | ECHO: the same raw bytes         |
//!
//! Ping is an ECHO carrying an 8 byte millisecond timestamp.
//!
//! ### Status Codes
//! - 0: OK
//! - 5: NOT_FOUND
//! - anything else: generic failure

use std::fmt;

mod builder;
mod header;
mod parser;

pub use builder::RequestBuilder;
pub use header::Header;
pub use parser::PayloadParser;

/// Version carried in every header
pub const PROTOCOL_VERSION: u16 = 1;

/// Header size: 2 byte type + 2 byte version + 4 byte payload size
pub const HEADER_SIZE: usize = 8;

pub const U16_SIZE: usize = 2;
pub const U32_SIZE: usize = 4;
pub const U64_SIZE: usize = 8;

/// Largest payload the server accepts (64 MiB)
pub const MAX_PAYLOAD_SIZE: usize = 64 * (1 << 20);

/// Largest key the server accepts (1 MiB)
pub const MAX_KEY_SIZE: usize = 1 << 20;

/// Largest value the server accepts (32 MiB)
pub const MAX_VALUE_SIZE: usize = 32 * (1 << 20);

/// Frame message types
///
/// Values outside the known set decode to `Unknown` so header decoding never
/// fails; rejecting them is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Echo,
    Get,
    Put,
    Delete,
    Ack,
    Data,
    Unknown(u16),
}

impl From<u16> for MessageType {
    fn from(value: u16) -> Self {
        match value {
            1 => MessageType::Echo,
            2 => MessageType::Get,
            3 => MessageType::Put,
            4 => MessageType::Delete,
            5 => MessageType::Ack,
            6 => MessageType::Data,
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for u16 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Echo => 1,
            MessageType::Get => 2,
            MessageType::Put => 3,
            MessageType::Delete => 4,
            MessageType::Ack => 5,
            MessageType::Data => 6,
            MessageType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = u16::from(*self);
        match self {
            MessageType::Unknown(_) => write!(f, "Unknown({})", raw),
            known => write!(f, "{:?}({})", known, raw),
        }
    }
}

/// Status code leading Get/Put/Delete response payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NotFound,
    Other(u16),
}

impl StatusCode {
    pub const OK: u16 = 0;
    pub const NOT_FOUND: u16 = 5;
}

impl From<u16> for StatusCode {
    fn from(value: u16) -> Self {
        match value {
            StatusCode::OK => StatusCode::Ok,
            StatusCode::NOT_FOUND => StatusCode::NotFound,
            other => StatusCode::Other(other),
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(value: StatusCode) -> Self {
        match value {
            StatusCode::Ok => StatusCode::OK,
            StatusCode::NotFound => StatusCode::NOT_FOUND,
            StatusCode::Other(other) => other,
        }
    }
}
