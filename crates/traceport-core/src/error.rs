//! Error types for Traceport

use thiserror::Error;

/// Result type alias using Traceport's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Traceport operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An identifier contained a non-hexadecimal character
    #[error("Invalid hex identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Serialized batch does not fit into a single datagram
    #[error("Payload of {size} bytes exceeds the maximum datagram size of {max} bytes")]
    OversizedPayload {
        /// Serialized payload length
        size: usize,
        /// Maximum payload accepted per datagram
        max: usize,
    },

    /// The kernel accepted fewer bytes than were submitted
    #[error("Partial datagram send: {sent} of {expected} bytes accepted")]
    PartialSend {
        /// Bytes accepted by the send
        sent: usize,
        /// Bytes submitted
        expected: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(value: impl Into<String>) -> Self {
        Self::InvalidIdentifier(value.into())
    }
}
