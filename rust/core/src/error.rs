//! Error types for the msgwire codec

use thiserror::Error;

/// Codec error types
///
/// Every failure the codec can surface is a distinct variant; nothing here
/// is retried internally and none of these conditions is undefined behavior.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Write attempted after the message was finished
    #[error("message is finished; no further writes are accepted")]
    WriteAfterFinish,

    /// Typed read would run past the end of the payload
    #[error("decode out of bounds: need {needed} bytes at offset {offset}, {remaining} remaining")]
    DecodeOutOfBounds {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Header shorter than the fixed 5-byte prefix
    #[error("truncated header: got {0} of 5 bytes")]
    TruncatedHeader(usize),

    /// Header length field is negative
    #[error("negative payload length in header: {0}")]
    NegativeLength(i32),

    /// Header type tag does not map to a known message type
    #[error("unknown message type tag: 0x{0:02x}")]
    UnknownMessageType(u8),

    /// String length prefix is negative or not a whole number of code units
    #[error("invalid string byte length: {0}")]
    InvalidStringLength(i32),

    /// String payload is not valid UTF-16
    #[error("invalid UTF-16 string payload: {0}")]
    InvalidUtf16(#[from] std::string::FromUtf16Error),

    /// Tick count outside the representable datetime range
    #[error("tick count {0} is outside the representable datetime range")]
    TimestampOutOfRange(i64),

    /// Instant too far from the epoch to encode as 100ns ticks
    #[error("timestamp {0} cannot be encoded as wire ticks")]
    UnencodableTimestamp(chrono::DateTime<chrono::Utc>),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, ProtocolError>;
