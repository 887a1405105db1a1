//! Command definitions
//!
//! The closed set of commands the client can send.

use std::borrow::Cow;

/// Command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Auth,
    Ping,
    Set,
    Get,
    Exists,
    Del,
    FlushAll,
    Expire,
    Ttl,
}

impl CommandType {
    /// Verb as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Auth => "AUTH",
            CommandType::Ping => "PING",
            CommandType::Set => "SET",
            CommandType::Get => "GET",
            CommandType::Exists => "EXISTS",
            CommandType::Del => "DEL",
            CommandType::FlushAll => "FLUSHALL",
            CommandType::Expire => "EXPIRE",
            CommandType::Ttl => "TTL",
        }
    }
}

/// A command ready to be encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Authenticate the connection
    Auth { password: Vec<u8> },

    /// Ping (health check)
    Ping,

    /// Store a value
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Fetch a value
    Get { key: Vec<u8> },

    Exists { key: Vec<u8> },

    /// Delete a key
    Del { key: Vec<u8> },

    /// Remove every key on the server
    FlushAll,

    /// Set a time-to-live in whole seconds
    Expire { key: Vec<u8>, seconds: u64 },

    /// Read the remaining time-to-live
    Ttl { key: Vec<u8> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Auth { .. } => CommandType::Auth,
            Command::Ping => CommandType::Ping,
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Exists { .. } => CommandType::Exists,
            Command::Del { .. } => CommandType::Del,
            Command::FlushAll => CommandType::FlushAll,
            Command::Expire { .. } => CommandType::Expire,
            Command::Ttl { .. } => CommandType::Ttl,
        }
    }

    /// Verb as it appears on the wire
    pub fn name(&self) -> &'static str {
        self.command_type().as_str()
    }

    /// Ordered wire arguments, verb first
    pub fn args(&self) -> Vec<Cow<'_, [u8]>> {
        let verb = Cow::Borrowed(self.name().as_bytes());
        match self {
            Command::Ping | Command::FlushAll => vec![verb],
            Command::Auth { password } => vec![verb, Cow::Borrowed(password.as_slice())],
            Command::Set { key, value } => vec![
                verb,
                Cow::Borrowed(key.as_slice()),
                Cow::Borrowed(value.as_slice()),
            ],
            Command::Get { key }
            | Command::Exists { key }
            | Command::Del { key }
            | Command::Ttl { key } => vec![verb, Cow::Borrowed(key.as_slice())],
            Command::Expire { key, seconds } => vec![
                verb,
                Cow::Borrowed(key.as_slice()),
                Cow::Owned(seconds.to_string().into_bytes()),
            ],
        }
    }
}
