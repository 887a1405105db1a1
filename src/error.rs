//! Error types for kvwire
//!
//! Transport and framing problems are errors. Command-level failures
//! (wrong password, missing key) are ordinary `bool`/`Option` results.

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// The socket could not be established. Fatal to the client instance.
    #[error("Connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Read or write failure on an established socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A well-formed reply whose type the operation has no mapping for
    #[error("Unexpected {kind} reply to {command}")]
    UnexpectedReply {
        command: &'static str,
        kind: &'static str,
    },

    /// Error reply for an operation that has no boolean failure channel
    #[error("Server error: {0}")]
    Server(String),

    #[error("Authentication rejected by server")]
    AuthRejected,

    // -------------------------------------------------------------------------
    // JSON Errors
    // -------------------------------------------------------------------------
    #[error("Stored value is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for the framing family: the byte stream can no longer be trusted.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            ClientError::Protocol(_) | ClientError::UnexpectedReply { .. }
        )
    }
}
