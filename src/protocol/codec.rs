//! Protocol codec
//!
//! Encoding of commands and decoding of replies.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! Every command is an array of bulk strings:
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg bytes>\r\n      (repeated argc times)
//! ```
//!
//! ### Reply Format
//! The first byte of the reply line selects the type:
//! ```text
//! +<status>\r\n
//! -<message>\r\n
//! :<i64>\r\n
//! $<len>\r\n<payload>\r\n       ($-1\r\n is null)
//! *<n>\r\n<n nested replies>     (*-1\r\n is null)
//! ```

use std::io::{BufRead, BufReader, Cursor, ErrorKind, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{ClientError, Result};
use super::{Command, Reply};

/// Largest bulk payload accepted (512 MB, the server-side limit)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest array length accepted
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;

/// Longest reply line accepted, terminator included
pub const MAX_LINE_LEN: u64 = 64 * 1024;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as an array of bulk strings
pub fn encode_command(command: &Command) -> BytesMut {
    let args = command.args();
    let payload: usize = args.iter().map(|a| a.len() + 16).sum();

    let mut buf = BytesMut::with_capacity(16 + payload);
    put_header(&mut buf, b'*', args.len() as i64);
    for arg in &args {
        put_bulk(&mut buf, arg);
    }
    buf
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Encoding
// =============================================================================

/// Encode a reply in server wire format
pub fn encode_reply(reply: &Reply) -> BytesMut {
    let mut buf = BytesMut::new();
    encode_reply_into(reply, &mut buf);
    buf
}

fn encode_reply_into(reply: &Reply, buf: &mut BytesMut) {
    match reply {
        Reply::Status(s) => put_line(buf, b'+', s.as_bytes()),
        Reply::Error(message) => put_line(buf, b'-', message.as_bytes()),
        Reply::Integer(n) => put_header(buf, b':', *n),
        Reply::Bulk(None) => put_header(buf, b'$', -1),
        Reply::Bulk(Some(data)) => put_bulk(buf, data),
        Reply::Array(None) => put_header(buf, b'*', -1),
        Reply::Array(Some(items)) => {
            put_header(buf, b'*', items.len() as i64);
            for item in items {
                encode_reply_into(item, buf);
            }
        }
    }
}

fn put_line(buf: &mut BytesMut, tag: u8, body: &[u8]) {
    buf.put_u8(tag);
    buf.put_slice(body);
    buf.put_slice(CRLF);
}

fn put_header(buf: &mut BytesMut, tag: u8, n: i64) {
    put_line(buf, tag, n.to_string().as_bytes());
}

fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
    put_header(buf, b'$', data.len() as i64);
    buf.put_slice(data);
    buf.put_slice(CRLF);
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Source of reply bytes: whole CRLF-terminated lines and exact-length payloads
pub trait ReplyReader {
    /// Read one line, returning it without the trailing `\r\n`
    fn next_line(&mut self) -> Result<Vec<u8>>;

    /// Read exactly `n` bytes
    fn next_exact(&mut self, n: usize) -> Result<Vec<u8>>;
}

impl<R: Read> ReplyReader for BufReader<R> {
    fn next_line(&mut self) -> Result<Vec<u8>> {
        read_crlf_line(self)
    }

    fn next_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        read_exact_bytes(self, n)
    }
}

impl<T: AsRef<[u8]>> ReplyReader for Cursor<T> {
    fn next_line(&mut self) -> Result<Vec<u8>> {
        read_crlf_line(self)
    }

    fn next_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        read_exact_bytes(self, n)
    }
}

/// Read a line terminated by `\r\n` from a buffered stream
pub(crate) fn read_crlf_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let read = reader.by_ref().take(MAX_LINE_LEN).read_until(b'\n', &mut line)?;

    if read == 0 {
        return Err(ClientError::Protocol(
            "Unexpected end of stream while reading reply".to_string(),
        ));
    }
    if !line.ends_with(b"\n") {
        if line.len() as u64 >= MAX_LINE_LEN {
            return Err(ClientError::Protocol(format!(
                "Reply line exceeds {} bytes",
                MAX_LINE_LEN
            )));
        }
        return Err(ClientError::Protocol(
            "Unexpected end of stream inside reply line".to_string(),
        ));
    }
    if !line.ends_with(CRLF) {
        return Err(ClientError::Protocol(
            "Reply line not terminated by CRLF".to_string(),
        ));
    }

    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

/// Read exactly `n` bytes; a short read is a framing error, not an I/O one
pub(crate) fn read_exact_bytes<R: Read>(reader: &mut R, n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ClientError::Protocol(format!(
                "Unexpected end of stream: expected {} payload bytes",
                n
            ))
        } else {
            ClientError::Io(e)
        }
    })?;
    Ok(buf)
}

/// Read exactly one complete reply
///
/// Blocks until the reply is complete or an error occurs.
pub fn read_reply<R: ReplyReader + ?Sized>(reader: &mut R) -> Result<Reply> {
    let line = reader.next_line()?;
    let (&tag, rest) = line
        .split_first()
        .ok_or_else(|| ClientError::Protocol("Empty reply line".to_string()))?;

    match tag {
        b'+' => Ok(Reply::Status(decode_text(rest, "status")?)),
        b'-' => Ok(Reply::Error(decode_text(rest, "error")?)),
        b':' => Ok(Reply::Integer(parse_integer(rest, "integer")?)),
        b'$' => read_bulk(reader, rest),
        b'*' => read_array(reader, rest),
        _ => Err(ClientError::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            tag
        ))),
    }
}

/// Decode a reply from a complete buffer
///
/// Returns the reply and the number of bytes consumed
pub fn decode_reply(bytes: &[u8]) -> Result<(Reply, usize)> {
    let mut cursor = Cursor::new(bytes);
    let reply = read_reply(&mut cursor)?;
    Ok((reply, cursor.position() as usize))
}

fn read_bulk<R: ReplyReader + ?Sized>(reader: &mut R, header: &[u8]) -> Result<Reply> {
    let len = match parse_length(header, "bulk", MAX_BULK_LEN)? {
        Some(len) => len,
        None => return Ok(Reply::Bulk(None)),
    };

    let payload = reader.next_exact(len)?;
    let terminator = reader.next_exact(CRLF.len())?;
    if terminator != CRLF {
        return Err(ClientError::Protocol(format!(
            "Bulk payload of {} bytes not followed by CRLF",
            len
        )));
    }

    Ok(Reply::Bulk(Some(payload.into())))
}

fn read_array<R: ReplyReader + ?Sized>(reader: &mut R, header: &[u8]) -> Result<Reply> {
    let count = match parse_length(header, "array", MAX_ARRAY_LEN)? {
        Some(count) => count,
        None => return Ok(Reply::Array(None)),
    };

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read_reply(reader)?);
    }
    Ok(Reply::Array(Some(items)))
}

fn decode_text(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ClientError::Protocol(format!("Invalid UTF-8 in {} reply: {}", what, e)))
}

fn parse_integer(digits: &[u8], what: &str) -> Result<i64> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            ClientError::Protocol(format!(
                "Malformed {}: {:?}",
                what,
                String::from_utf8_lossy(digits)
            ))
        })
}

/// Parse a length prefix; `-1` is the null marker
fn parse_length(digits: &[u8], what: &str, max: i64) -> Result<Option<usize>> {
    let len = parse_integer(digits, &format!("{} length", what))?;
    match len {
        -1 => Ok(None),
        n if n < 0 => Err(ClientError::Protocol(format!(
            "Negative {} length: {}",
            what, n
        ))),
        n if n > max => Err(ClientError::Protocol(format!(
            "{} length too large: {} (max {})",
            what, n, max
        ))),
        n => Ok(Some(n as usize)),
    }
}
