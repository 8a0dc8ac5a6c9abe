//! Request builder
//!
//! Accumulates one outgoing frame and writes it to the connection in a
//! single flush.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use super::{Header, HEADER_SIZE};
use crate::error::{OtterError, Result};
use crate::transport::write_full;

/// Builds a frame and flushes it to a writer
///
/// The header must be written first and must declare the exact number of
/// payload bytes the following writes append; `flush` refuses a frame whose
/// payload disagrees with its header.
pub struct RequestBuilder<'a, W: Write + ?Sized> {
    writer: &'a mut W,
    buf: BytesMut,
    declared: Option<u32>,
}

impl<'a, W: Write + ?Sized> RequestBuilder<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
            declared: None,
        }
    }

    pub fn write_header(&mut self, header: Header) {
        self.buf.reserve(HEADER_SIZE + header.payload_size as usize);
        self.buf.put_slice(&header.encode());
        self.declared = Some(header.payload_size);
    }

    pub fn write_u16(&mut self, n: u16) {
        self.buf.put_u16(n);
    }

    pub fn write_u32(&mut self, n: u32) {
        self.buf.put_u32(n);
    }

    pub fn write_u64(&mut self, n: u64) {
        self.buf.put_u64(n);
    }

    /// Append a string as length (4) + bytes
    pub fn write_string(&mut self, s: &[u8]) {
        self.buf.put_u32(s.len() as u32);
        self.buf.put_slice(s);
    }

    pub fn write_raw_bytes(&mut self, b: &[u8]) {
        self.buf.put_slice(b);
    }

    /// Bytes accumulated so far, header included
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write the whole frame, looping over partial writes
    ///
    /// The buffer is cleared on success so the builder can be reused.
    pub fn flush(&mut self) -> Result<()> {
        let declared = self.declared.ok_or_else(|| {
            OtterError::InvalidFrame("frame flushed without a header".to_string())
        })?;

        let payload = self.buf.len() - HEADER_SIZE;
        if payload != declared as usize {
            return Err(OtterError::InvalidFrame(format!(
                "header declares {} payload bytes, {} written",
                declared, payload
            )));
        }

        write_full(&mut *self.writer, &self.buf)?;
        self.writer.flush()?;

        tracing::trace!(bytes = self.buf.len(), "flushed frame");

        self.buf.clear();
        self.declared = None;
        Ok(())
    }
}
