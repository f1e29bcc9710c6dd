//! Command definitions
//!
//! Represents requests from clients.

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, ContactPatch};

/// Command types (first byte of a request frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Add = 0x01,
    Find = 0x02,
    Delete = 0x03,
    List = 0x04,
    Update = 0x05,
    Ping = 0x06,
}

impl CommandType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::Add),
            0x02 => Some(CommandType::Find),
            0x03 => Some(CommandType::Delete),
            0x04 => Some(CommandType::List),
            0x05 => Some(CommandType::Update),
            0x06 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Add a new contact
    Add { contact: Contact },

    /// Find contacts by name pattern
    Find { pattern: String },

    /// Delete contacts by name pattern
    Delete { pattern: String },

    /// List every contact
    List,

    /// Partially update one contact
    Update { name: String, patch: ContactPatch },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Add { .. } => CommandType::Add,
            Command::Find { .. } => CommandType::Find,
            Command::Delete { .. } => CommandType::Delete,
            Command::List => CommandType::List,
            Command::Update { .. } => CommandType::Update,
            Command::Ping => CommandType::Ping,
        }
    }
}
