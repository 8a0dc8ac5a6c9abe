//! Payload parser
//!
//! A cursor over a fully received payload. It never performs I/O; a `None`
//! means the payload is shorter than the fields it claims to carry, and the
//! cursor does not move.

use super::{Header, HEADER_SIZE, U16_SIZE, U32_SIZE, U64_SIZE};

/// Cursor over a received payload
#[derive(Debug)]
pub struct PayloadParser<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> PayloadParser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn read_header(&mut self) -> Option<Header> {
        let bytes = self.take(HEADER_SIZE)?;
        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(bytes);
        Some(Header::decode(&header))
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        let b = self.take(U16_SIZE)?;
        Some(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        let b = self.take(U32_SIZE)?;
        Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        let b = self.take(U64_SIZE)?;
        let mut raw = [0u8; U64_SIZE];
        raw.copy_from_slice(b);
        Some(u64::from_be_bytes(raw))
    }

    /// Read a length-prefixed string
    ///
    /// The length prefix is only consumed if the whole string is present.
    pub fn read_string(&mut self) -> Option<&'a [u8]> {
        let start = self.offset;
        let len = self.read_u32()? as usize;
        match self.take(len) {
            Some(s) => Some(s),
            None => {
                self.offset = start;
                None
            }
        }
    }

    pub fn read_raw_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        self.take(n)
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let slice = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Some(slice)
    }
}
