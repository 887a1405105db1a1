//! Command Client
//!
//! Typed operations on top of a single [`Connection`].
//!
//! ## Reply Mapping
//! - Boolean operations fold an error reply into `false`
//! - `get`/`ttl` surface an error reply as [`ClientError::Server`]
//! - A reply type an operation cannot map is [`ClientError::UnexpectedReply`]
//!
//! ## Example
//! ```no_run
//! use kvwire::Client;
//!
//! let mut client = Client::new()?;
//! client.set("greeting", "hello")?;
//! assert_eq!(client.get("greeting")?.as_deref(), Some("hello"));
//! # Ok::<(), kvwire::ClientError>(())
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{ClientError, Result};
use crate::network::Connection;
use crate::protocol::{encode_command, read_reply, Command, Reply};

/// A client shared between threads; the mutex serializes requests
pub type SharedClient = Arc<Mutex<Client>>;

/// Synchronous client for one server connection
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Connect to `127.0.0.1:6379`
    pub fn new() -> Result<Self> {
        Self::with_host_port(DEFAULT_HOST, DEFAULT_PORT)
    }

    /// Connect to `127.0.0.1` on a custom port
    pub fn with_port(port: u16) -> Result<Self> {
        Self::with_host_port(DEFAULT_HOST, port)
    }

    /// Connect to a custom host and port
    pub fn with_host_port(host: impl Into<String>, port: u16) -> Result<Self> {
        Ok(Self {
            connection: Connection::open(host, port)?,
        })
    }

    /// Connect with full configuration
    ///
    /// If the config carries a password, AUTH is sent once here. It is never
    /// resent by the client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self {
            connection: Connection::open_with(config)?,
        };
        if let Some(password) = &config.password {
            if !client.auth(password)? {
                return Err(ClientError::AuthRejected);
            }
        }
        Ok(client)
    }

    /// Wrap the client for use from several threads
    pub fn into_shared(self) -> SharedClient {
        Arc::new(Mutex::new(self))
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Close the connection. Later calls fail with an I/O error.
    pub fn close(&mut self) {
        self.connection.close();
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Authenticate the connection. A rejected password is `Ok(false)`.
    pub fn auth(&mut self, password: impl AsRef<[u8]>) -> Result<bool> {
        let reply = self.call(Command::Auth {
            password: password.as_ref().to_vec(),
        })?;
        expect_status("AUTH", reply)
    }

    pub fn ping(&mut self) -> Result<bool> {
        let reply = self.call(Command::Ping)?;
        expect_status("PING", reply)
    }

    /// Store a string value
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<bool> {
        let reply = self.call(Command::Set {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        })?;
        expect_status("SET", reply)
    }

    /// Fetch a string value; `None` if the key is absent
    pub fn get(&mut self, key: impl AsRef<[u8]>) -> Result<Option<String>> {
        match self.get_bytes(key)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| ClientError::Protocol(format!("GET value is not UTF-8: {}", e))),
            None => Ok(None),
        }
    }

    /// Fetch a value without UTF-8 validation
    pub fn get_bytes(&mut self, key: impl AsRef<[u8]>) -> Result<Option<Bytes>> {
        let reply = self.call(Command::Get {
            key: key.as_ref().to_vec(),
        })?;
        match reply {
            Reply::Bulk(value) => Ok(value),
            Reply::Error(message) => Err(ClientError::Server(message)),
            other => Err(unexpected("GET", &other)),
        }
    }

    pub fn exists(&mut self, key: impl AsRef<[u8]>) -> Result<bool> {
        let reply = self.call(Command::Exists {
            key: key.as_ref().to_vec(),
        })?;
        expect_count("EXISTS", reply)
    }

    /// Delete a key; `false` if it did not exist
    pub fn del(&mut self, key: impl AsRef<[u8]>) -> Result<bool> {
        let reply = self.call(Command::Del {
            key: key.as_ref().to_vec(),
        })?;
        expect_count("DEL", reply)
    }

    /// Remove every key on the server
    pub fn flush_all(&mut self) -> Result<bool> {
        let reply = self.call(Command::FlushAll)?;
        expect_status("FLUSHALL", reply)
    }

    /// Expire the key after `duration`, truncated to whole seconds
    ///
    /// Returns whether the key existed and the expiry was set.
    pub fn expire(&mut self, key: impl AsRef<[u8]>, duration: Duration) -> Result<bool> {
        let reply = self.call(Command::Expire {
            key: key.as_ref().to_vec(),
            seconds: duration.as_secs(),
        })?;
        match reply {
            Reply::Integer(n) => Ok(n == 1),
            Reply::Error(message) => Ok(folded_error("EXPIRE", &message)),
            other => Err(unexpected("EXPIRE", &other)),
        }
    }

    /// Remaining time-to-live in seconds
    ///
    /// `-1` means no expiry is set, `-2` means the key does not exist.
    pub fn ttl(&mut self, key: impl AsRef<[u8]>) -> Result<i64> {
        let reply = self.call(Command::Ttl {
            key: key.as_ref().to_vec(),
        })?;
        match reply {
            Reply::Integer(n) => Ok(n),
            Reply::Error(message) => Err(ClientError::Server(message)),
            other => Err(unexpected("TTL", &other)),
        }
    }

    // -------------------------------------------------------------------------
    // JSON Documents
    // -------------------------------------------------------------------------

    /// Store `document` as its compact JSON string
    pub fn set_json<T>(&mut self, key: impl AsRef<[u8]>, document: &T) -> Result<bool>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_vec(document).map_err(ClientError::Serialization)?;
        self.set(key, value)
    }

    /// Fetch and parse a JSON document; `None` if the key is absent
    pub fn get_json<T: DeserializeOwned>(&mut self, key: impl AsRef<[u8]>) -> Result<Option<T>> {
        match self.get_bytes(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(ClientError::MalformedJson),
            None => Ok(None),
        }
    }

    /// Send one command and read exactly one reply
    ///
    /// An I/O or framing failure leaves unread reply bytes behind, so the
    /// connection is closed; later calls fail instead of reading them.
    fn call(&mut self, command: Command) -> Result<Reply> {
        tracing::trace!("-> {}", command.name());
        let result = self
            .connection
            .send(&encode_command(&command))
            .and_then(|()| read_reply(&mut self.connection));

        match result {
            Ok(reply) => {
                tracing::trace!("<- {} reply to {}", reply.kind(), command.name());
                Ok(reply)
            }
            Err(e @ (ClientError::Io(_) | ClientError::Protocol(_))) => {
                if self.connection.is_open() {
                    tracing::warn!("{} failed, closing connection: {}", command.name(), e);
                    self.connection.close();
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

// =============================================================================
// Reply Mapping
// =============================================================================

fn expect_status(command: &'static str, reply: Reply) -> Result<bool> {
    match reply {
        Reply::Status(_) => Ok(true),
        Reply::Error(message) => Ok(folded_error(command, &message)),
        other => Err(unexpected(command, &other)),
    }
}

fn expect_count(command: &'static str, reply: Reply) -> Result<bool> {
    match reply {
        Reply::Integer(n) => Ok(n > 0),
        Reply::Error(message) => Ok(folded_error(command, &message)),
        other => Err(unexpected(command, &other)),
    }
}

fn folded_error(command: &str, message: &str) -> bool {
    tracing::warn!("{} rejected by server: {}", command, message);
    false
}

fn unexpected(command: &'static str, reply: &Reply) -> ClientError {
    ClientError::UnexpectedReply {
        command,
        kind: reply.kind(),
    }
}
