//! Error types for the stream transport

use thiserror::Error;

/// Transport error types
#[derive(Error, Debug)]
pub enum NetworkError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frames and field decode failures
    #[error("Protocol error: {0}")]
    Protocol(#[from] msgwire_core::ProtocolError),

    /// Declared payload length above the configured limit
    #[error("Payload of {length} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge { length: usize, max: usize },

    /// Peer closed the stream in the middle of a frame
    #[error("Connection closed mid-frame with {0} bytes pending")]
    ConnectionClosed(usize),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, NetworkError>;

impl NetworkError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            NetworkError::Io(err) => {
                matches!(
                    err.kind(),
                    std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::WouldBlock
                        | std::io::ErrorKind::Interrupted
                )
            }
            _ => false,
        }
    }
}
