//! Inbound message reader
//!
//! An [`InboundMessage`] wraps a received payload and decodes fields
//! strictly in the order they were written. The payload carries no type
//! markers, so a read sequence that diverges from the write sequence
//! reinterprets raw bytes. Every read either advances the cursor past the
//! bytes it consumed or fails and leaves the cursor where it was, so a
//! caller can recover from a failed read without losing its place.

use std::ops::Range;

use bytes::Bytes;
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::header::{Header, MessageType, HEADER_SIZE};
use crate::wire;

/// Sequential reader over a single received payload
#[derive(Debug, Clone)]
pub struct InboundMessage {
    message_type: MessageType,
    payload: Bytes,
    cursor: usize,
}

impl InboundMessage {
    /// Wrap an already-separated payload, cursor at the first byte
    pub fn new(message_type: MessageType, payload: Bytes) -> Self {
        Self {
            message_type,
            payload,
            cursor: 0,
        }
    }

    /// Parse a complete frame (header plus payload) into a reader
    ///
    /// The payload view shares the frame's storage. Bytes past the declared
    /// payload length are left untouched; they belong to the next frame.
    pub fn from_frame(frame: Bytes) -> Result<Self> {
        let header = Header::decode(&frame)?;
        let needed = header.payload_len();
        let remaining = frame.len() - HEADER_SIZE;
        if remaining < needed {
            return Err(ProtocolError::DecodeOutOfBounds {
                offset: 0,
                needed,
                remaining,
            });
        }

        let payload = frame.slice(HEADER_SIZE..HEADER_SIZE + needed);
        Ok(Self::new(header.message_type, payload))
    }

    /// Message purpose tag from the frame header
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Whole payload, regardless of cursor position
    pub fn raw_data(&self) -> &Bytes {
        &self.payload
    }

    /// Byte offset of the next read
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the cursor and the end of the payload
    pub fn remaining(&self) -> usize {
        self.payload.len() - self.cursor
    }

    /// Bounds-check a read of `width` bytes at the cursor
    fn span(&self, width: usize) -> Result<Range<usize>> {
        match self.cursor.checked_add(width) {
            Some(end) if end <= self.payload.len() => Ok(self.cursor..end),
            _ => Err(ProtocolError::DecodeOutOfBounds {
                offset: self.cursor,
                needed: width,
                remaining: self.remaining(),
            }),
        }
    }

    fn take(&mut self, width: usize) -> Result<&[u8]> {
        let span = self.span(width)?;
        self.cursor = span.end;
        Ok(&self.payload[span])
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a bool; any nonzero byte decodes as true
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Read a signed 16-bit integer
    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read an unsigned 16-bit integer
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a signed 32-bit integer
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read an unsigned 32-bit integer
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a signed 64-bit integer
    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        Ok(i64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read an unsigned 64-bit integer
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read exactly `count` raw bytes into an owned buffer
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.take(count)?.to_vec())
    }

    /// Read exactly `count` raw bytes as a zero-copy view of the payload
    pub fn read_bytes_shared(&mut self, count: usize) -> Result<Bytes> {
        let span = self.span(count)?;
        self.cursor = span.end;
        Ok(self.payload.slice(span))
    }

    /// Read a length-prefixed UTF-16LE string
    ///
    /// On any failure, including a bad prefix or malformed text after the
    /// prefix was consumed, the cursor is restored to where it was before
    /// the call.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.cursor;
        match self.read_string_inner() {
            Ok(value) => Ok(value),
            Err(err) => {
                self.cursor = start;
                Err(err)
            }
        }
    }

    fn read_string_inner(&mut self) -> Result<String> {
        let byte_len = self.read_i32()?;
        if byte_len < 0 || byte_len % 2 != 0 {
            return Err(ProtocolError::InvalidStringLength(byte_len));
        }
        let text = self.take(byte_len as usize)?;
        wire::utf16_string(text)
    }

    /// Read an 8-byte tick count as a UTC instant
    ///
    /// The cursor is restored if the ticks are outside the representable
    /// range.
    pub fn read_datetime(&mut self) -> Result<DateTime<Utc>> {
        let start = self.cursor;
        match self.read_i64().and_then(wire::datetime_from_ticks) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.cursor = start;
                Err(err)
            }
        }
    }

    /// Read an 8-byte tick count and present it in the local timezone
    ///
    /// The wire value is the same UTC instant either way; only the
    /// presentation differs.
    pub fn read_datetime_local(&mut self) -> Result<DateTime<Local>> {
        Ok(self.read_datetime()?.with_timezone(&Local))
    }

    /// Read a 16-byte identifier
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let bytes = self.take(16)?;
        let mut raw = [0u8; 16];
        raw.copy_from_slice(bytes);
        Ok(Uuid::from_bytes(raw))
    }
}
