//! Frame header codec
//!
//! Fixed 8 byte header: message type, protocol version, payload size.

use super::{MessageType, HEADER_SIZE, PROTOCOL_VERSION};

/// Header preceding every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub message_type: MessageType,
    pub version: u16,
    /// Exact number of payload bytes following the header
    pub payload_size: u32,
}

impl Header {
    /// Header for an outgoing frame at the current protocol version
    pub fn new(message_type: MessageType, payload_size: u32) -> Self {
        Self {
            message_type,
            version: PROTOCOL_VERSION,
            payload_size,
        }
    }

    /// Encode the header
    ///
    /// Format: message_type (2) + version (2) + payload_size (4), big-endian
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&u16::from(self.message_type).to_be_bytes());
        out[2..4].copy_from_slice(&self.version.to_be_bytes());
        out[4..8].copy_from_slice(&self.payload_size.to_be_bytes());
        out
    }

    /// Decode a header
    ///
    /// Every bit pattern is a structurally valid header.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let message_type = u16::from_be_bytes([bytes[0], bytes[1]]);
        let version = u16::from_be_bytes([bytes[2], bytes[3]]);
        let payload_size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Self {
            message_type: MessageType::from(message_type),
            version,
            payload_size,
        }
    }
}
