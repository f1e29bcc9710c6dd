//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::contact::Contact;
use crate::error::{BookError, ErrorKind, Result};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    AlreadyExists = 0x02,
    InvalidArgument = 0x03,
    Error = 0x04,
}

impl Status {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::NotFound),
            0x02 => Some(Status::AlreadyExists),
            0x03 => Some(Status::InvalidArgument),
            0x04 => Some(Status::Error),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Status {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::AlreadyExists => Status::AlreadyExists,
            ErrorKind::NotFound => Status::NotFound,
            ErrorKind::InvalidArgument => Status::InvalidArgument,
            ErrorKind::Internal => Status::Error,
        }
    }
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Add and delete: a human-readable summary
    Done { message: String },

    /// Find and list
    Contacts(Vec<Contact>),

    /// Update: summary plus the merged contact
    Updated { message: String, contact: Contact },

    Pong,
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (bincode `Reply` for OK, error message otherwise)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response carrying `reply`
    pub fn ok(reply: &Reply) -> Result<Self> {
        Ok(Self {
            status: Status::Ok,
            payload: Some(bincode::serialize(reply)?),
        })
    }

    /// Create an error response; the status follows the error kind
    pub fn from_error(err: &BookError) -> Self {
        Self::error(Status::from(err.kind()), &err.to_string())
    }

    /// Create a non-OK response with a message
    pub fn error(status: Status, message: &str) -> Self {
        Self {
            status,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Client side: turn the response back into a reply or typed error
    pub fn into_result(self) -> Result<Reply> {
        let payload = self.payload.unwrap_or_default();

        if self.status == Status::Ok {
            return Ok(bincode::deserialize(&payload)?);
        }

        let message = String::from_utf8_lossy(&payload).into_owned();
        Err(match self.status {
            Status::NotFound => BookError::NotFound(message),
            Status::AlreadyExists => BookError::AlreadyExists(message),
            Status::InvalidArgument => BookError::InvalidArgument(message),
            _ => BookError::Network(message),
        })
    }
}
