//! Message Wire Protocol - Core Module
//!
//! This crate provides the fixed-framing binary message codec: a 5-byte
//! header, a growable outbound builder, and a sequential inbound reader.
//! It performs no I/O; transports live in the network crate.

pub mod error;
pub mod header;
pub mod inbound;
pub mod outbound;
pub mod wire;

pub use error::*;
pub use header::*;
pub use inbound::*;
pub use outbound::*;

/// Re-export common types
pub mod prelude {
    pub use crate::{
        error::{ProtocolError, Result},
        header::{Header, MessageType, HEADER_SIZE},
        inbound::InboundMessage,
        outbound::OutboundMessage,
    };
    pub use bytes::Bytes;
    pub use chrono::{DateTime, Local, Utc};
    pub use uuid::Uuid;
}

/// Current version of the message wire protocol
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
