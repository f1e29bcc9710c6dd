//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │   Payload (bincode)         │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: ADD     - Payload: contact
//! - 0x02: FIND    - Payload: name pattern
//! - 0x03: DELETE  - Payload: name pattern
//! - 0x04: LIST    - Payload: none
//! - 0x05: UPDATE  - Payload: name + patch
//! - 0x06: PING    - Payload: none
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ALREADY_EXISTS
//! - 0x03: INVALID_ARGUMENT
//! - 0x04: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Reply, Response, Status};
pub use codec::{encode_command, decode_command, encode_response, decode_response};
pub use codec::{read_command, write_command, read_response, write_response};
pub use codec::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
