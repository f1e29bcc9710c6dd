//! # Address Book
//!
//! A concurrent address-book service with:
//! - Contacts keyed by normalized (trimmed, lowercased) name
//! - Shell-style glob lookups and deletes (`*`, `?`, `[...]`)
//! - Partial updates with rename-on-update
//! - In-memory or SQLite storage behind one `ContactStore` trait
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (Acceptor + Worker Pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Directory                               │
//! │      (Normalization, Pattern Policy, Typed Errors)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  InMemory   │          │ Relational  │
//!   │  (RwLock)   │          │  (SQLite)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod contact;
pub mod pattern;
pub mod store;
pub mod network;
pub mod protocol;
pub mod directory;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BookError, ErrorKind, Result};
pub use config::{Backend, Config};
pub use contact::{Contact, ContactPatch};
pub use directory::Directory;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the address book
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
