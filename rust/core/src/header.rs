//! Message header codec
//!
//! Every message on the wire starts with the same 5-byte prefix: one message
//! type tag followed by the payload length as a little-endian signed 32-bit
//! integer. The length counts payload bytes only, never the header itself.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Fixed header size (1 type byte + 4 length bytes)
pub const HEADER_SIZE: usize = 5;

/// Message purpose tag, carried in header byte 0
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Default/invalid sentinel; well-behaved peers never send this
    #[default]
    Unknown = 0,
    /// Application payload
    Data = 1,
    /// Liveness announcement
    IsAlive = 2,
    /// Peer identity verification
    Verification = 3,
    /// Round-trip probe
    Ping = 4,
}

impl MessageType {
    /// Raw tag value as written into header byte 0
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(MessageType::Unknown),
            1 => Ok(MessageType::Data),
            2 => Ok(MessageType::IsAlive),
            3 => Ok(MessageType::Verification),
            4 => Ok(MessageType::Ping),
            _ => Err(ProtocolError::UnknownMessageType(tag)),
        }
    }
}

/// Decoded 5-byte message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Message purpose tag
    pub message_type: MessageType,
    /// Payload length in bytes, excluding the header
    pub length: i32,
}

impl Header {
    /// Create a header for a payload of the given byte length
    pub fn new(message_type: MessageType, payload_len: usize) -> Self {
        debug_assert!(payload_len <= i32::MAX as usize);
        Self {
            message_type,
            length: payload_len as i32,
        }
    }

    /// Decode the fixed 5-byte prefix
    ///
    /// Rejects truncated input, unrecognized type tags and negative lengths.
    /// An upper bound on the length is transport policy and is not checked
    /// here.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProtocolError::TruncatedHeader(bytes.len()));
        }

        let message_type = MessageType::try_from(bytes[0])?;
        let length = i32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        if length < 0 {
            return Err(ProtocolError::NegativeLength(length));
        }

        Ok(Self {
            message_type,
            length,
        })
    }

    /// Encode to the fixed 5-byte wire form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = self.message_type.tag();
        bytes[1..].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }

    /// Payload length as a usize (`length >= 0` holds after a successful decode)
    pub fn payload_len(&self) -> usize {
        self.length as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = Header::new(MessageType::Data, 13);
        let bytes = header.encode();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..], &13i32.to_le_bytes());

        let decoded = Header::decode(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.payload_len(), 13);
    }

    #[test]
    fn test_unknown_is_zero_and_default() {
        assert_eq!(MessageType::Unknown.tag(), 0);
        assert_eq!(MessageType::default(), MessageType::Unknown);
    }

    #[test]
    fn test_all_tags_roundtrip() {
        for message_type in [
            MessageType::Unknown,
            MessageType::Data,
            MessageType::IsAlive,
            MessageType::Verification,
            MessageType::Ping,
        ] {
            assert_eq!(
                MessageType::try_from(message_type.tag()).unwrap(),
                message_type
            );
        }
    }

    #[test]
    fn test_unrecognized_tag_is_caught() {
        let mut bytes = Header::new(MessageType::Ping, 0).encode();
        bytes[0] = 0x2a;

        let err = Header::decode(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessageType(0x2a)));
    }

    #[test]
    fn test_negative_length_is_rejected() {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = MessageType::Data.tag();
        bytes[1..].copy_from_slice(&(-1i32).to_le_bytes());

        let err = Header::decode(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::NegativeLength(-1)));
    }

    #[test]
    fn test_truncated_header() {
        let err = Header::decode(&[1, 0, 0]).unwrap_err();
        assert!(matches!(err, ProtocolError::TruncatedHeader(3)));
    }
}
