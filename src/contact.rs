//! Contact records
//!
//! A contact is identified only by its normalized name. Renaming a contact
//! means removing the old key and inserting the new one.

use serde::{Deserialize, Serialize};

/// One address book entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Contact {
    /// Build a contact with every field normalized
    pub fn new(name: &str, phone: &str, address: &str) -> Self {
        Self {
            name: normalize(name),
            phone: normalize(phone),
            address: normalize(address),
        }
    }

    /// Apply a partial update: non-empty patch fields win, empty ones keep
    /// the current value.
    pub fn merged(&self, patch: &ContactPatch) -> Contact {
        fn pick(new: &str, old: &str) -> String {
            if new.is_empty() {
                old.to_string()
            } else {
                new.to_string()
            }
        }

        Contact {
            name: pick(&patch.name, &self.name),
            phone: pick(&patch.phone, &self.phone),
            address: pick(&patch.address, &self.address),
        }
    }
}

/// Partial update payload, empty string means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl ContactPatch {
    pub fn new(name: &str, phone: &str, address: &str) -> Self {
        Self {
            name: normalize(name),
            phone: normalize(phone),
            address: normalize(address),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = normalize(name);
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = normalize(phone);
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = normalize(address);
        self
    }

    /// Copy of this patch with every field normalized
    pub fn normalized(&self) -> ContactPatch {
        ContactPatch::new(&self.name, &self.phone, &self.address)
    }
}

/// Trim surrounding whitespace and lowercase
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
