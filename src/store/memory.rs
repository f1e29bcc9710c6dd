//! In-memory contact store
//!
//! HashMap-based store with a single RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::contact::{Contact, ContactPatch};
use crate::error::Result;
use crate::pattern::NamePattern;

use super::{contact_exists, name_taken, no_such_contact, ContactStore};

/// Contacts held in process memory
///
/// ## Concurrency:
/// - `contacts`: one RwLock guards every access
/// - Reads (get/find/len) take the shared lock, many run at once
/// - Writes (insert/delete/update) take the exclusive lock and do their
///   existence checks inside it
pub struct InMemoryStore {
    /// Normalized name → contact
    contacts: RwLock<HashMap<String, Contact>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            contacts: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.read().is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore for InMemoryStore {
    fn insert(&self, contact: Contact) -> Result<()> {
        let mut contacts = self.contacts.write();

        if contacts.contains_key(&contact.name) {
            return Err(contact_exists(&contact.name));
        }

        contacts.insert(contact.name.clone(), contact);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Contact>> {
        Ok(self.contacts.read().get(name).cloned())
    }

    fn find(&self, pattern: &NamePattern) -> Result<Vec<Contact>> {
        let mut found: Vec<Contact> = {
            let contacts = self.contacts.read();
            match pattern {
                NamePattern::Exact(name) => contacts.get(name).cloned().into_iter().collect(),
                _ => contacts
                    .values()
                    .filter(|c| pattern.matches(&c.name))
                    .cloned()
                    .collect(),
            }
        };

        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn delete(&self, pattern: &NamePattern) -> Result<usize> {
        let mut contacts = self.contacts.write();
        let before = contacts.len();

        match pattern {
            NamePattern::All => contacts.clear(),
            NamePattern::Exact(name) => {
                contacts.remove(name);
            }
            NamePattern::Glob { .. } => contacts.retain(|name, _| !pattern.matches(name)),
        }

        Ok(before - contacts.len())
    }

    fn update(&self, name: &str, patch: &ContactPatch) -> Result<Contact> {
        let mut contacts = self.contacts.write();

        let current = contacts.get(name).ok_or_else(|| no_such_contact(name))?;
        let merged = current.merged(patch);

        if merged.name != name && contacts.contains_key(&merged.name) {
            return Err(name_taken(&merged.name));
        }

        contacts.remove(name);
        contacts.insert(merged.name.clone(), merged.clone());
        Ok(merged)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.contacts.read().len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
