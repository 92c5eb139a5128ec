//! Frame reassembly codec
//!
//! Splits a byte stream back into complete frames. TCP delivers bytes with
//! no message boundaries, so the decoder buffers until a full header plus
//! declared payload is present, then yields the payload as an
//! [`InboundMessage`]. Plugged into [`tokio_util::codec::Framed`] this
//! drives any async byte stream.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

use msgwire_core::{Header, InboundMessage, HEADER_SIZE};

use crate::error::NetworkError;

/// Default upper bound on a single payload (64 MiB)
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

/// Codec turning a byte stream into messages and finished messages into bytes
#[derive(Debug, Clone)]
pub struct MessageCodec {
    max_payload_len: usize,
}

impl MessageCodec {
    /// Create a codec with the default payload limit
    pub fn new() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    /// Create a codec with a custom payload limit
    pub fn with_max_payload_len(max_payload_len: usize) -> Self {
        Self { max_payload_len }
    }

    /// Configured payload limit in bytes
    pub fn max_payload_len(&self) -> usize {
        self.max_payload_len
    }
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for MessageCodec {
    type Item = InboundMessage;
    type Error = NetworkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        // Peek the header without consuming it; the limit check must run
        // before any payload bytes are committed.
        let header = Header::decode(&src[..HEADER_SIZE])?;
        let payload_len = header.payload_len();

        if payload_len > self.max_payload_len {
            warn!(
                "Rejecting {:?} frame: {} byte payload exceeds limit of {}",
                header.message_type, payload_len, self.max_payload_len
            );
            return Err(NetworkError::PayloadTooLarge {
                length: payload_len,
                max: self.max_payload_len,
            });
        }

        if src.len() < HEADER_SIZE + payload_len {
            src.reserve(HEADER_SIZE + payload_len - src.len());
            return Ok(None);
        }

        src.advance(HEADER_SIZE);
        let payload = src.split_to(payload_len).freeze();

        debug!(
            "Decoded {:?} frame with {} byte payload",
            header.message_type, payload_len
        );
        Ok(Some(InboundMessage::new(header.message_type, payload)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(message) => Ok(Some(message)),
            None if src.is_empty() => Ok(None),
            None => {
                warn!("Stream ended mid-frame with {} bytes buffered", src.len());
                Err(NetworkError::ConnectionClosed(src.len()))
            }
        }
    }
}

/// Outbound side is pass-through: messages arrive already framed by
/// the builder's `finish`.
impl Encoder<Bytes> for MessageCodec {
    type Error = NetworkError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}
