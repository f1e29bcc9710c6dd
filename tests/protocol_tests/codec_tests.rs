//! Codec Tests
//!
//! Tests for command and response framing.

use std::io::Cursor;

use addressbook::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, CommandType, Reply, Response, Status,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use addressbook::{BookError, Contact, ContactPatch, ErrorKind};

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_command_header_carries_type() {
    let cases = [
        (
            Command::Add {
                contact: Contact::new("alice", "111", "addr1"),
            },
            CommandType::Add,
        ),
        (
            Command::Find {
                pattern: "j*".to_string(),
            },
            CommandType::Find,
        ),
        (
            Command::Delete {
                pattern: "*".to_string(),
            },
            CommandType::Delete,
        ),
        (Command::List, CommandType::List),
        (
            Command::Update {
                name: "alice".to_string(),
                patch: ContactPatch::default().with_phone("222"),
            },
            CommandType::Update,
        ),
        (Command::Ping, CommandType::Ping),
    ];

    for (command, expected) in cases {
        let encoded = encode_command(&command).unwrap();
        assert_eq!(encoded[0], expected as u8);

        let payload_len = u32::from_be_bytes([encoded[1], encoded[2], encoded[3], encoded[4]]);
        assert_eq!(payload_len as usize, encoded.len() - HEADER_SIZE);

        assert_eq!(decode_command(&encoded).unwrap(), command);
    }
}

#[test]
fn test_decode_incomplete_header() {
    let err = decode_command(&[0x01, 0x00]).unwrap_err();
    assert!(matches!(err, BookError::Protocol(_)));
}

#[test]
fn test_decode_incomplete_payload() {
    let mut encoded = encode_command(&Command::Find {
        pattern: "bob".to_string(),
    })
    .unwrap();
    encoded.truncate(encoded.len() - 1);

    let err = decode_command(&encoded).unwrap_err();
    assert!(matches!(err, BookError::Protocol(_)));
}

#[test]
fn test_decode_unknown_command_type() {
    let mut encoded = encode_command(&Command::Ping).unwrap();
    encoded[0] = 0xFF;

    let err = decode_command(&encoded).unwrap_err();
    assert!(err.to_string().contains("0xff"));
}

#[test]
fn test_decode_type_mismatch() {
    let mut encoded = encode_command(&Command::List).unwrap();
    encoded[0] = CommandType::Ping as u8;

    let err = decode_command(&encoded).unwrap_err();
    assert!(matches!(err, BookError::Protocol(_)));
}

#[test]
fn test_decode_payload_too_large() {
    let mut frame = vec![CommandType::List as u8];
    frame.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    let err = decode_command(&frame).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn test_decode_garbage_payload() {
    let mut frame = vec![CommandType::Find as u8];
    frame.extend_from_slice(&3u32.to_be_bytes());
    frame.extend_from_slice(&[0xFF, 0xFF, 0xFF]);

    let err = decode_command(&frame).unwrap_err();
    assert!(matches!(err, BookError::Serialization(_)));
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_ok_response_carries_reply() {
    let reply = Reply::Contacts(vec![
        Contact::new("jane", "1", "a"),
        Contact::new("john", "2", "b"),
    ]);
    let response = Response::ok(&reply).unwrap();

    let decoded = decode_response(&encode_response(&response)).unwrap();
    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.into_result().unwrap(), reply);
}

#[test]
fn test_error_status_follows_kind() {
    let cases = [
        (BookError::NotFound("nf".into()), Status::NotFound, ErrorKind::NotFound),
        (
            BookError::AlreadyExists("ae".into()),
            Status::AlreadyExists,
            ErrorKind::AlreadyExists,
        ),
        (
            BookError::InvalidArgument("ia".into()),
            Status::InvalidArgument,
            ErrorKind::InvalidArgument,
        ),
        (BookError::Storage("db".into()), Status::Error, ErrorKind::Internal),
    ];

    for (err, status, kind) in cases {
        let message = err.to_string();
        let response = Response::from_error(&err);
        assert_eq!(response.status, status);

        let decoded = decode_response(&encode_response(&response)).unwrap();
        let round_tripped = decoded.into_result().unwrap_err();
        assert_eq!(round_tripped.kind(), kind);
        assert!(round_tripped.to_string().contains(&message));
    }
}

#[test]
fn test_decode_unknown_status() {
    let frame = [0x7F, 0, 0, 0, 0];
    let err = decode_response(&frame).unwrap_err();
    assert!(err.to_string().contains("0x7f"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_multiple_commands() {
    let commands = vec![
        Command::Add {
            contact: Contact::new("alice", "111", "addr1"),
        },
        Command::List,
        Command::Delete {
            pattern: "a*".to_string(),
        },
    ];

    let mut buffer = Vec::new();
    for command in &commands {
        write_command(&mut buffer, command).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), expected);
    }

    let err = read_command(&mut cursor).unwrap_err();
    assert!(matches!(err, BookError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::ok(&Reply::Pong).unwrap()).unwrap();
    write_response(&mut buffer, &Response::error(Status::NotFound, "gone")).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_response(&mut cursor).unwrap().into_result().unwrap(), Reply::Pong);

    let err = read_response(&mut cursor).unwrap().into_result().unwrap_err();
    assert!(matches!(err, BookError::NotFound(ref m) if m == "gone"));
}
