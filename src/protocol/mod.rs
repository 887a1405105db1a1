//! Protocol Module
//!
//! Defines the RESP wire protocol spoken with the server.
//!
//! ## Request Format
//! ```text
//! *3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n
//! ```
//!
//! ### Commands
//! - AUTH password
//! - PING
//! - SET key value
//! - GET key
//! - EXISTS key
//! - DEL key
//! - FLUSHALL
//! - EXPIRE key seconds
//! - TTL key
//!
//! ## Reply Tags
//! - `+` status
//! - `-` error
//! - `:` integer
//! - `$` bulk string (`$-1` = null)
//! - `*` array (`*-1` = null)

mod command;
mod reply;
mod codec;

pub use command::{Command, CommandType};
pub use reply::Reply;
pub use codec::{
    decode_reply, encode_command, encode_reply, read_reply, write_command, ReplyReader,
    MAX_ARRAY_LEN, MAX_BULK_LEN, MAX_LINE_LEN,
};

pub(crate) use codec::{read_crlf_line, read_exact_bytes};
