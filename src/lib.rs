//! Message Wire Protocol
//!
//! Fixed-framing binary message codec with a stream transport. Messages are
//! a 5-byte header (1-byte type tag, 4-byte little-endian payload length)
//! followed by a sequentially encoded payload. Build messages with
//! [`OutboundMessage`], decode them with [`InboundMessage`], and move them
//! over any async byte stream with [`Connection`].
//!
//! ```
//! use msgwire::{InboundMessage, OutboundMessage};
//!
//! let mut message = OutboundMessage::new();
//! message.write_i32(42)?;
//! message.write_string("ok")?;
//! message.write_bool(true)?;
//! let bytes = message.finish();
//! assert_eq!(bytes.len(), 18);
//!
//! let mut reader = InboundMessage::from_frame(bytes)?;
//! assert_eq!(reader.read_i32()?, 42);
//! assert_eq!(reader.read_string()?, "ok");
//! assert!(reader.read_bool()?);
//! # Ok::<(), msgwire::ProtocolError>(())
//! ```

pub use msgwire_core::{
    wire, Header, InboundMessage, MessageType, OutboundMessage, ProtocolError, HEADER_SIZE,
    VERSION,
};
pub use msgwire_network::{
    Connection, MessageCodec, NetworkError, DEFAULT_MAX_PAYLOAD_LEN,
};

/// Re-export common types
pub mod prelude {
    pub use msgwire_core::prelude::*;
    pub use msgwire_network::{Connection, MessageCodec, NetworkError};
}
