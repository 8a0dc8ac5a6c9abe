//! Error types for the Otter client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::protocol::MessageType;

/// Result type alias using OtterError
pub type Result<T> = std::result::Result<T, OtterError>;

/// Unified error type for Otter client operations
#[derive(Debug, Error)]
pub enum OtterError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dial {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The peer closed the stream before a full header or payload arrived
    #[error("Connection closed after {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },

    #[error("Connection is broken; reconnect before issuing further requests")]
    ConnectionBroken,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Payload too large: {size} bytes (buffer capacity {capacity})")]
    PayloadTooLarge { size: u32, capacity: usize },

    #[error("Unexpected response type: {actual} (expected {expected})")]
    UnexpectedMessageType {
        expected: MessageType,
        actual: MessageType,
    },

    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u16, actual: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Key not found")]
    NotFound,

    #[error("Request failed with status {0}")]
    Status(u16),

    #[error("Echo mismatch: sent {sent} bytes, received {received} bytes")]
    EchoMismatch { sent: usize, received: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OtterError {
    /// Whether the error leaves the stream at an unknown position.
    ///
    /// A session that hits a fatal error must be reconnected.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OtterError::Io(_)
                | OtterError::Dial { .. }
                | OtterError::Truncated { .. }
                | OtterError::ConnectionBroken
                | OtterError::PayloadTooLarge { .. }
                | OtterError::UnexpectedMessageType { .. }
                | OtterError::VersionMismatch { .. }
        )
    }

    /// Whether this is the not-found outcome of a get
    pub fn is_not_found(&self) -> bool {
        matches!(self, OtterError::NotFound)
    }
}
