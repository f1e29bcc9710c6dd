//! Blocking client
//!
//! Speaks the framed protocol to a running server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::contact::{Contact, ContactPatch};
use crate::error::{BookError, Result};
use crate::protocol::{read_response, write_command, Command, Reply};

/// Client connection to an address book server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command and wait for its reply
    ///
    /// Non-OK statuses come back as the matching `BookError` variant.
    pub fn call(&mut self, command: &Command) -> Result<Reply> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)?.into_result()
    }

    pub fn add_contact(&mut self, name: &str, phone: &str, address: &str) -> Result<String> {
        let command = Command::Add {
            contact: Contact {
                name: name.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
            },
        };
        match self.call(&command)? {
            Reply::Done { message } => Ok(message),
            other => Err(unexpected(other)),
        }
    }

    pub fn find_contacts(&mut self, pattern: &str) -> Result<Vec<Contact>> {
        let command = Command::Find {
            pattern: pattern.to_string(),
        };
        match self.call(&command)? {
            Reply::Contacts(contacts) => Ok(contacts),
            other => Err(unexpected(other)),
        }
    }

    pub fn delete_contacts(&mut self, pattern: &str) -> Result<String> {
        let command = Command::Delete {
            pattern: pattern.to_string(),
        };
        match self.call(&command)? {
            Reply::Done { message } => Ok(message),
            other => Err(unexpected(other)),
        }
    }

    pub fn list_contacts(&mut self) -> Result<Vec<Contact>> {
        match self.call(&Command::List)? {
            Reply::Contacts(contacts) => Ok(contacts),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the server's message and the merged contact
    pub fn update_contact(&mut self, name: &str, patch: ContactPatch) -> Result<(String, Contact)> {
        let command = Command::Update {
            name: name.to_string(),
            patch,
        };
        match self.call(&command)? {
            Reply::Updated { message, contact } => Ok((message, contact)),
            other => Err(unexpected(other)),
        }
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.call(&Command::Ping)? {
            Reply::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(reply: Reply) -> BookError {
    BookError::Protocol(format!("unexpected reply: {:?}", reply))
}
