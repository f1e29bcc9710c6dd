//! Store Module
//!
//! Backends that hold the contact set.
//!
//! ## Responsibilities
//! - Keep at most one contact per normalized name
//! - Run every method as one atomic critical section (one lock acquisition
//!   or one SQL transaction), so check-and-mutate never races
//! - Return matches sorted by name
//!
//! ## Variants
//! - [`InMemoryStore`]: `HashMap` behind a `RwLock`, gone on shutdown
//! - [`RelationalStore`]: SQLite table, globs translated to `LIKE`

mod memory;
mod relational;

pub use memory::InMemoryStore;
pub use relational::RelationalStore;

use crate::contact::{Contact, ContactPatch};
use crate::error::{BookError, Result};
use crate::pattern::NamePattern;

/// Storage capability the directory is written against
///
/// All names and patch fields handed to a store are already normalized.
pub trait ContactStore: Send + Sync {
    /// Insert a contact under its name, failing with `AlreadyExists` if the
    /// name is taken
    fn insert(&self, contact: Contact) -> Result<()>;

    /// Look up a single contact by name
    fn get(&self, name: &str) -> Result<Option<Contact>>;

    /// All contacts whose name matches `pattern`, sorted by name
    fn find(&self, pattern: &NamePattern) -> Result<Vec<Contact>>;

    /// Remove every contact whose name matches `pattern`, returning the count
    fn delete(&self, pattern: &NamePattern) -> Result<usize>;

    /// Merge `patch` into the contact stored under `name`, moving it to the
    /// new key when the name changes
    fn update(&self, name: &str, patch: &ContactPatch) -> Result<Contact>;

    /// Number of stored contacts
    fn len(&self) -> Result<usize>;

    /// Short backend label for logs
    fn backend_name(&self) -> &'static str;
}

// =============================================================================
// Shared error constructors (identical messages across backends)
// =============================================================================

pub(crate) fn contact_exists(name: &str) -> BookError {
    BookError::AlreadyExists(format!("contact {} already exists", name))
}

pub(crate) fn name_taken(name: &str) -> BookError {
    BookError::AlreadyExists(format!("name {} is already taken", name))
}

pub(crate) fn no_such_contact(name: &str) -> BookError {
    BookError::NotFound(format!("no such contact with name: {}", name))
}
