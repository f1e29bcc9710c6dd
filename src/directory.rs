//! Directory Module
//!
//! The contact directory that every transport handler calls into.
//!
//! ## Responsibilities
//! - Normalize names, patterns and patch fields
//! - Apply the lookup policy: empty or `*` selects everything, a plain name
//!   is an exact lookup, anything with wildcards is a glob
//! - Turn empty results into typed errors carrying the caller's pattern
//! - Route protocol commands to operations

use std::sync::Arc;

use crate::config::{Backend, Config};
use crate::contact::{normalize, Contact, ContactPatch};
use crate::error::{BookError, Result};
use crate::pattern::{check_name, NamePattern};
use crate::protocol::{Command, Reply};
use crate::store::{ContactStore, InMemoryStore, RelationalStore};

/// Reply message for a successful add
pub const ADDED_MESSAGE: &str = "successfully added";

/// Reply message for a successful update
pub const UPDATED_MESSAGE: &str = "successfully updated";

/// Error message for listing an empty directory
pub const EMPTY_MESSAGE: &str = "address book is empty";

/// The address book
///
/// Owns one [`ContactStore`]; each operation maps to one store call, so
/// each operation is a single atomic critical section. Share it between
/// handlers with an `Arc`.
pub struct Directory {
    store: Arc<dyn ContactStore>,
}

impl Directory {
    /// Wrap an existing store
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// An empty in-memory directory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Open the backend named by `config`
    pub fn open(config: &Config) -> Result<Self> {
        let store: Arc<dyn ContactStore> = match &config.backend {
            Backend::InMemory => Arc::new(InMemoryStore::new()),
            Backend::Relational { database_url } => Arc::new(RelationalStore::open(database_url)?),
        };

        tracing::info!(backend = store.backend_name(), "Directory opened");
        Ok(Self::new(store))
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Add { contact } => {
                self.add_contact(&contact.name, &contact.phone, &contact.address)?;
                Ok(Reply::Done {
                    message: ADDED_MESSAGE.to_string(),
                })
            }
            Command::Find { pattern } => Ok(Reply::Contacts(self.find_contacts(&pattern)?)),
            Command::Delete { pattern } => Ok(Reply::Done {
                message: self.delete_contacts(&pattern)?,
            }),
            Command::List => Ok(Reply::Contacts(self.list_contacts()?)),
            Command::Update { name, patch } => Ok(Reply::Updated {
                message: UPDATED_MESSAGE.to_string(),
                contact: self.update_contact(&name, &patch)?,
            }),
            Command::Ping => Ok(Reply::Pong),
        }
    }

    /// Add a new contact
    ///
    /// Fails with `AlreadyExists` if a contact with the same normalized
    /// name is present, and with `InvalidArgument` if the name is empty or
    /// contains pattern characters.
    pub fn add_contact(&self, name: &str, phone: &str, address: &str) -> Result<()> {
        let contact = Contact::new(name, phone, address);
        check_name(&contact.name)?;

        let name = contact.name.clone();
        self.store.insert(contact)?;

        tracing::debug!(name = %name, "Contact added");
        Ok(())
    }

    /// Contacts whose name matches `pattern`, sorted by name
    pub fn find_contacts(&self, pattern: &str) -> Result<Vec<Contact>> {
        let parsed = NamePattern::parse(pattern)?;
        if parsed.is_all() {
            return self.list_contacts();
        }

        let found = self.store.find(&parsed)?;
        if found.is_empty() {
            return Err(no_match(BookError::NotFound, pattern));
        }

        Ok(found)
    }

    /// Delete every contact whose name matches `pattern`
    ///
    /// An empty pattern or `*` deletes everything. Returns a summary with
    /// the number of deleted contacts.
    pub fn delete_contacts(&self, pattern: &str) -> Result<String> {
        let parsed = NamePattern::parse(pattern)?;

        let count = self.store.delete(&parsed)?;
        if count == 0 {
            return Err(no_match(BookError::InvalidArgument, pattern));
        }

        tracing::debug!(pattern = %parsed.as_str(), count, "Contacts deleted");
        Ok(format!("{} contact(s) was(were) successfully deleted", count))
    }

    /// Every stored contact, sorted by name
    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let contacts = self.store.find(&NamePattern::All)?;
        if contacts.is_empty() {
            return Err(BookError::NotFound(EMPTY_MESSAGE.to_string()));
        }
        Ok(contacts)
    }

    /// Apply a partial update to the contact named `name`
    ///
    /// Empty patch fields keep their current value. A changed name moves
    /// the contact to the new key and fails with `AlreadyExists` if
    /// another contact already has it. New names follow the same rules as
    /// in [`Directory::add_contact`].
    pub fn update_contact(&self, name: &str, patch: &ContactPatch) -> Result<Contact> {
        let name = normalize(name);
        let patch = patch.normalized();
        if !patch.name.is_empty() {
            check_name(&patch.name)?;
        }

        let updated = self.store.update(&name, &patch)?;

        tracing::debug!(name = %name, new_name = %updated.name, "Contact updated");
        Ok(updated)
    }

    /// Number of stored contacts
    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.len()? == 0)
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.store
    }
}

fn no_match(kind: fn(String) -> BookError, pattern: &str) -> BookError {
    kind(format!("no such contact with name pattern: {}", pattern))
}
