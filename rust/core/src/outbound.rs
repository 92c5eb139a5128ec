//! Outbound message builder
//!
//! An [`OutboundMessage`] accumulates typed writes into a growable buffer
//! seeded with a placeholder header. [`finish`](OutboundMessage::finish)
//! patches the real payload length over the placeholder and freezes the
//! buffer into an immutable, transmit-ready byte sequence. Field order is
//! part of the protocol: the receiver must read the same types in the same
//! order, since the payload carries no markers of its own.

use std::mem;

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::header::{Header, MessageType, HEADER_SIZE};
use crate::wire;

/// Growable builder for a single outbound message
#[derive(Debug)]
pub struct OutboundMessage {
    message_type: MessageType,
    state: State,
}

#[derive(Debug)]
enum State {
    /// Append-only buffer; header length bytes still the placeholder
    Building(BytesMut),
    /// Frozen transmit-ready bytes with the length patched in
    Finished(Bytes),
}

impl OutboundMessage {
    /// Create a builder for a [`MessageType::Data`] message
    pub fn new() -> Self {
        Self::with_type(MessageType::Data)
    }

    /// Create a builder for the given message type
    pub fn with_type(message_type: MessageType) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u8(message_type.tag());
        buf.put_i32_le(0);

        Self {
            message_type,
            state: State::Building(buf),
        }
    }

    /// Assemble a finished message directly from pre-encoded fragments
    ///
    /// Allocates exactly once and is byte-identical to writing every
    /// fragment with [`write_bytes`](Self::write_bytes) and calling
    /// [`finish`](Self::finish).
    pub fn from_fragments(message_type: MessageType, fragments: &[&[u8]]) -> Bytes {
        let total: usize = fragments.iter().map(|fragment| fragment.len()).sum();

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + total);
        buf.put_slice(&Header::new(message_type, total).encode());
        for fragment in fragments {
            buf.put_slice(fragment);
        }
        buf.freeze()
    }

    /// Message purpose tag this builder was created with
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Whether [`finish`](Self::finish) has already run
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Payload bytes written so far (total payload, once finished)
    pub fn payload_len(&self) -> usize {
        match &self.state {
            State::Building(buf) => buf.len() - HEADER_SIZE,
            State::Finished(bytes) => bytes.len() - HEADER_SIZE,
        }
    }

    /// Patch the payload length into bytes 1..5 and freeze the buffer
    ///
    /// Idempotent: a second call returns the same bytes. The growable buffer
    /// is released here; all later writes are rejected.
    pub fn finish(&mut self) -> Bytes {
        match &mut self.state {
            State::Finished(bytes) => bytes.clone(),
            State::Building(buf) => {
                let payload_len = buf.len() - HEADER_SIZE;
                debug_assert!(payload_len <= i32::MAX as usize);
                buf[1..HEADER_SIZE].copy_from_slice(&(payload_len as i32).to_le_bytes());

                let frozen = mem::take(buf).freeze();
                self.state = State::Finished(frozen.clone());
                frozen
            }
        }
    }

    fn buffer(&mut self) -> Result<&mut BytesMut> {
        match &mut self.state {
            State::Building(buf) => Ok(buf),
            State::Finished(_) => Err(ProtocolError::WriteAfterFinish),
        }
    }

    /// Append a single byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer()?.put_u8(value);
        Ok(())
    }

    /// Append a bool as one canonical byte (1 = true, 0 = false)
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.buffer()?.put_u8(u8::from(value));
        Ok(())
    }

    /// Append a signed 16-bit integer
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.buffer()?.put_i16_le(value);
        Ok(())
    }

    /// Append an unsigned 16-bit integer
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.buffer()?.put_u16_le(value);
        Ok(())
    }

    /// Append a signed 32-bit integer
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.buffer()?.put_i32_le(value);
        Ok(())
    }

    /// Append an unsigned 32-bit integer
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer()?.put_u32_le(value);
        Ok(())
    }

    /// Append a signed 64-bit integer
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.buffer()?.put_i64_le(value);
        Ok(())
    }

    /// Append an unsigned 64-bit integer
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.buffer()?.put_u64_le(value);
        Ok(())
    }

    /// Append raw bytes verbatim, without a length prefix
    ///
    /// The receiver must know the exact count out of band; pair with
    /// [`InboundMessage::read_bytes`](crate::InboundMessage::read_bytes).
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.buffer()?.put_slice(value);
        Ok(())
    }

    /// Append a string as a 4-byte byte-length prefix plus UTF-16LE text
    ///
    /// The prefix counts bytes, not characters.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let encoded = wire::utf16_bytes(value);
        debug_assert!(encoded.len() <= i32::MAX as usize);

        let buf = self.buffer()?;
        buf.put_i32_le(encoded.len() as i32);
        buf.put_slice(&encoded);
        Ok(())
    }

    /// Append an instant as its 8-byte UTC tick count
    pub fn write_datetime(&mut self, value: DateTime<Utc>) -> Result<()> {
        let buf = self.buffer()?;
        let ticks = wire::ticks_from_datetime(value)?;
        buf.put_i64_le(ticks);
        Ok(())
    }

    /// Append an identifier as its canonical 16 bytes, verbatim
    pub fn write_uuid(&mut self, value: Uuid) -> Result<()> {
        self.buffer()?.put_slice(value.as_bytes());
        Ok(())
    }
}

impl Default for OutboundMessage {
    fn default() -> Self {
        Self::new()
    }
}
