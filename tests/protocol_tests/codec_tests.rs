//! Codec Tests
//!
//! Tests for command encoding and reply decoding.

use std::io::{BufReader, Cursor};

use kvwire::protocol::{
    decode_reply, encode_command, encode_reply, read_reply, write_command, Command, CommandType,
    Reply, MAX_BULK_LEN, MAX_LINE_LEN,
};
use kvwire::ClientError;

// =============================================================================
// Helper Functions
// =============================================================================

fn decode(bytes: &[u8]) -> Reply {
    let (reply, consumed) = decode_reply(bytes).unwrap();
    assert_eq!(consumed, bytes.len(), "decoder left bytes behind");
    reply
}

fn decode_err(bytes: &[u8]) -> ClientError {
    decode_reply(bytes).unwrap_err()
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_wire_format_ping() {
    assert_eq!(&encode_command(&Command::Ping)[..], b"*1\r\n$4\r\nPING\r\n");
}

#[test]
fn test_wire_format_set() {
    let cmd = Command::Set {
        key: b"key".to_vec(),
        value: b"value".to_vec(),
    };

    assert_eq!(
        &encode_command(&cmd)[..],
        b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n"
    );
}

#[test]
fn test_wire_format_expire_renders_seconds_as_decimal() {
    let cmd = Command::Expire {
        key: b"k".to_vec(),
        seconds: 120,
    };

    assert_eq!(
        &encode_command(&cmd)[..],
        b"*3\r\n$6\r\nEXPIRE\r\n$1\r\nk\r\n$3\r\n120\r\n"
    );
}

#[test]
fn test_wire_format_every_verb() {
    let cases = vec![
        (Command::Auth { password: b"pw".to_vec() }, "AUTH", 2),
        (Command::Get { key: b"k".to_vec() }, "GET", 2),
        (Command::Exists { key: b"k".to_vec() }, "EXISTS", 2),
        (Command::Del { key: b"k".to_vec() }, "DEL", 2),
        (Command::FlushAll, "FLUSHALL", 1),
        (Command::Ttl { key: b"k".to_vec() }, "TTL", 2),
    ];

    for (cmd, verb, argc) in cases {
        let encoded = encode_command(&cmd);
        let expected_prefix = format!("*{}\r\n${}\r\n{}\r\n", argc, verb.len(), verb);
        assert!(
            encoded.starts_with(expected_prefix.as_bytes()),
            "{} encoded as {:?}",
            verb,
            String::from_utf8_lossy(&encoded)
        );
        assert_eq!(cmd.name(), verb);
    }
}

#[test]
fn test_encode_binary_safe_arguments() {
    // CRLF and NUL inside a value must not break framing
    let value = b"line1\r\nline2\0\"quoted\"".to_vec();
    let cmd = Command::Set {
        key: b"bin".to_vec(),
        value: value.clone(),
    };
    let encoded = encode_command(&cmd);

    // The server sees the same thing the client's own decoder sees
    let decoded = decode(&encoded);
    assert_eq!(
        decoded,
        Reply::array(vec![
            Reply::bulk(&b"SET"[..]),
            Reply::bulk(&b"bin"[..]),
            Reply::bulk(value),
        ])
    );
}

#[test]
fn test_encode_empty_argument() {
    let cmd = Command::Set {
        key: b"k".to_vec(),
        value: vec![],
    };

    assert!(encode_command(&cmd).ends_with(b"$0\r\n\r\n"));
}

#[test]
fn test_command_type_mapping() {
    assert_eq!(Command::Ping.command_type(), CommandType::Ping);
    assert_eq!(Command::FlushAll.command_type(), CommandType::FlushAll);
    assert_eq!(
        Command::Expire { key: vec![], seconds: 1 }.command_type(),
        CommandType::Expire
    );
    assert_eq!(CommandType::FlushAll.as_str(), "FLUSHALL");
}

#[test]
fn test_write_command_to_stream() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::Get { key: b"k".to_vec() }).unwrap();

    assert_eq!(buffer, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n");
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_status() {
    assert_eq!(decode(b"+OK\r\n"), Reply::status("OK"));
}

#[test]
fn test_decode_error() {
    assert_eq!(
        decode(b"-WRONGPASS invalid password\r\n"),
        Reply::error("WRONGPASS invalid password")
    );
}

#[test]
fn test_decode_integers() {
    assert_eq!(decode(b":0\r\n"), Reply::Integer(0));
    assert_eq!(decode(b":-2\r\n"), Reply::Integer(-2));
    assert_eq!(
        decode(b":9223372036854775807\r\n"),
        Reply::Integer(i64::MAX)
    );
}

#[test]
fn test_decode_bulk() {
    assert_eq!(decode(b"$5\r\nhello\r\n"), Reply::bulk(&b"hello"[..]));
}

#[test]
fn test_decode_bulk_containing_crlf() {
    assert_eq!(decode(b"$4\r\na\r\nb\r\n"), Reply::bulk(&b"a\r\nb"[..]));
}

#[test]
fn test_decode_empty_bulk() {
    assert_eq!(decode(b"$0\r\n\r\n"), Reply::bulk(&b""[..]));
}

#[test]
fn test_decode_null_bulk() {
    let reply = decode(b"$-1\r\n");
    assert_eq!(reply, Reply::null());
    assert!(reply.is_null());
}

#[test]
fn test_decode_null_array() {
    let reply = decode(b"*-1\r\n");
    assert_eq!(reply, Reply::Array(None));
    assert!(reply.is_null());
}

#[test]
fn test_decode_nested_array() {
    let bytes = b"*3\r\n:1\r\n*2\r\n+a\r\n$-1\r\n$3\r\nxyz\r\n";

    assert_eq!(
        decode(bytes),
        Reply::array(vec![
            Reply::Integer(1),
            Reply::array(vec![Reply::status("a"), Reply::null()]),
            Reply::bulk(&b"xyz"[..]),
        ])
    );
}

#[test]
fn test_decode_reports_consumed_bytes() {
    let bytes = b":1\r\n:2\r\n";
    let (first, consumed) = decode_reply(bytes).unwrap();

    assert_eq!(first, Reply::Integer(1));
    assert_eq!(consumed, 4);

    let (second, _) = decode_reply(&bytes[consumed..]).unwrap();
    assert_eq!(second, Reply::Integer(2));
}

#[test]
fn test_encode_reply_matches_decoder() {
    let reply = Reply::array(vec![
        Reply::status("OK"),
        Reply::error("ERR nope"),
        Reply::Integer(-1),
        Reply::bulk(&b"v"[..]),
        Reply::null(),
        Reply::Array(None),
    ]);
    let encoded = encode_reply(&reply);

    assert_eq!(
        &encoded[..],
        &b"*6\r\n+OK\r\n-ERR nope\r\n:-1\r\n$1\r\nv\r\n$-1\r\n*-1\r\n"[..]
    );
    assert_eq!(decode(&encoded), reply);
}

#[test]
fn test_reply_kind_names() {
    assert_eq!(Reply::status("OK").kind(), "status");
    assert_eq!(Reply::Integer(3).kind(), "integer");
    assert_eq!(Reply::null().kind(), "null bulk");
    assert_eq!(Reply::array(vec![]).kind(), "array");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_unknown_reply_type() {
    let err = decode_err(b"!oops\r\n");
    assert!(err.is_protocol());
    assert!(err.to_string().contains("Unknown reply type"));
}

#[test]
fn test_empty_reply_line() {
    let err = decode_err(b"\r\n");
    assert!(err.to_string().contains("Empty reply line"));
}

#[test]
fn test_empty_input() {
    let err = decode_err(b"");
    assert!(err.is_protocol());
    assert!(err.to_string().contains("end of stream"));
}

#[test]
fn test_line_without_crlf() {
    let err = decode_err(b"+OK\n");
    assert!(err.to_string().contains("not terminated by CRLF"));
}

#[test]
fn test_truncated_line() {
    let err = decode_err(b"+OK");
    assert!(err.is_protocol());
    assert!(err.to_string().contains("end of stream"));
}

#[test]
fn test_malformed_integer() {
    let err = decode_err(b":12abc\r\n");
    assert!(err.to_string().contains("Malformed integer"));
}

#[test]
fn test_malformed_bulk_length() {
    let err = decode_err(b"$x\r\nabc\r\n");
    assert!(err.to_string().contains("Malformed bulk length"));
}

#[test]
fn test_negative_bulk_length() {
    let err = decode_err(b"$-5\r\n");
    assert!(err.to_string().contains("Negative bulk length"));
}

#[test]
fn test_oversized_bulk_length() {
    let bytes = format!("${}\r\n", MAX_BULK_LEN + 1);
    let err = decode_err(bytes.as_bytes());
    assert!(err.to_string().contains("too large"));
}

#[test]
fn test_truncated_bulk_payload() {
    let err = decode_err(b"$10\r\nhello");
    assert!(err.is_protocol());
    assert!(err.to_string().contains("expected 10 payload bytes"));
}

#[test]
fn test_bulk_payload_without_terminator() {
    let err = decode_err(b"$3\r\nabcXY");
    assert!(err.to_string().contains("not followed by CRLF"));
}

#[test]
fn test_truncated_array() {
    let err = decode_err(b"*2\r\n:1\r\n");
    assert!(err.is_protocol());
}

#[test]
fn test_overlong_line() {
    let mut bytes = vec![b'+'; MAX_LINE_LEN as usize + 10];
    bytes.extend_from_slice(b"\r\n");

    let err = decode_err(&bytes);
    assert!(err.to_string().contains("exceeds"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_read_reply_from_buffered_stream() {
    let mut reader = BufReader::new(&b"$3\r\nfoo\r\n+OK\r\n"[..]);

    assert_eq!(read_reply(&mut reader).unwrap(), Reply::bulk(&b"foo"[..]));
    assert_eq!(read_reply(&mut reader).unwrap(), Reply::status("OK"));
}

#[test]
fn test_read_multiple_replies_from_cursor() {
    let replies = vec![
        Reply::status("PONG"),
        Reply::Integer(1),
        Reply::null(),
        Reply::error("ERR x"),
    ];

    let mut buffer = Vec::new();
    for reply in &replies {
        buffer.extend_from_slice(&encode_reply(reply));
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &replies {
        assert_eq!(&read_reply(&mut cursor).unwrap(), expected);
    }
}
