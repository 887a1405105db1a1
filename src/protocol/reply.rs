//! Reply definitions
//!
//! One decoded server reply.

use bytes::Bytes;

/// A server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Simple status: +OK\r\n
    Status(String),

    /// Error: -ERR message\r\n
    Error(String),

    /// Integer: :1000\r\n
    Integer(i64),

    /// Bulk string: $5\r\nhello\r\n, or $-1\r\n for null
    Bulk(Option<Bytes>),

    /// Array: *2\r\n..., or *-1\r\n for null
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Create a status reply
    pub fn status(s: impl Into<String>) -> Self {
        Reply::Status(s.into())
    }

    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }

    /// Create a bulk reply
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(data.into()))
    }

    /// Create a null bulk reply
    pub fn null() -> Self {
        Reply::Bulk(None)
    }

    /// Create an array reply
    pub fn array(items: Vec<Reply>) -> Self {
        Reply::Array(Some(items))
    }

    /// Null bulk or null array
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::Array(None))
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(Some(_)) => "bulk",
            Reply::Bulk(None) => "null bulk",
            Reply::Array(Some(_)) => "array",
            Reply::Array(None) => "null array",
        }
    }
}
