//! Message Wire Protocol - Network Module
//!
//! Stream transport for the message wire protocol: frame reassembly over
//! async byte streams and a message-oriented connection wrapper

pub mod codec;
pub mod connection;
pub mod error;

pub use codec::*;
pub use connection::*;
pub use error::*;
