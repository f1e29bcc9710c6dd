//! In-Memory Store Tests
//!
//! Tests verify:
//! - Insert / get / len
//! - Pattern find and delete
//! - Atomic update with rename
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use addressbook::pattern::NamePattern;
use addressbook::store::{ContactStore, InMemoryStore};
use addressbook::{Contact, ContactPatch, ErrorKind};

// =============================================================================
// Helper Functions
// =============================================================================

fn store_with(names: &[&str]) -> InMemoryStore {
    let store = InMemoryStore::new();
    for name in names {
        store.insert(Contact::new(name, "phone", "addr")).unwrap();
    }
    store
}

fn pattern(raw: &str) -> NamePattern {
    NamePattern::parse(raw).unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = InMemoryStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len().unwrap(), 0);
    assert_eq!(store.backend_name(), "memory");
}

#[test]
fn test_insert_and_get() {
    let store = InMemoryStore::new();
    let contact = Contact::new("alice", "111", "addr1");

    store.insert(contact.clone()).unwrap();

    assert_eq!(store.get("alice").unwrap(), Some(contact));
    assert_eq!(store.get("bob").unwrap(), None);
}

#[test]
fn test_insert_duplicate() {
    let store = store_with(&["alice"]);

    let err = store.insert(Contact::new("alice", "999", "x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(store.get("alice").unwrap().unwrap().phone, "phone");
}

// =============================================================================
// Find / Delete Tests
// =============================================================================

#[test]
fn test_find_is_sorted() {
    let store = store_with(&["carol", "alice", "bob"]);

    let found = store.find(&NamePattern::All).unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[test]
fn test_find_no_match_returns_empty() {
    let store = store_with(&["alice"]);
    assert!(store.find(&pattern("z*")).unwrap().is_empty());
    assert!(store.find(&pattern("zed")).unwrap().is_empty());
}

#[test]
fn test_delete_counts() {
    let store = store_with(&["john", "jane", "bob"]);

    assert_eq!(store.delete(&pattern("j*")).unwrap(), 2);
    assert_eq!(store.delete(&pattern("j*")).unwrap(), 0);
    assert_eq!(store.delete(&pattern("bob")).unwrap(), 1);
    assert!(store.is_empty());
}

#[test]
fn test_delete_all() {
    let store = store_with(&["john", "jane", "bob"]);
    assert_eq!(store.delete(&NamePattern::All).unwrap(), 3);
    assert!(store.is_empty());
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_merges_fields() {
    let store = InMemoryStore::new();
    store.insert(Contact::new("alice", "111", "addr1")).unwrap();

    let patch = ContactPatch::default().with_address("addr2");
    let updated = store.update("alice", &patch).unwrap();

    assert_eq!(updated, Contact::new("alice", "111", "addr2"));
    assert_eq!(store.get("alice").unwrap(), Some(updated));
}

#[test]
fn test_update_rename() {
    let store = store_with(&["alice"]);

    let patch = ContactPatch::default().with_name("alicia");
    store.update("alice", &patch).unwrap();

    assert_eq!(store.get("alice").unwrap(), None);
    assert!(store.get("alicia").unwrap().is_some());
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_update_rename_collision() {
    let store = store_with(&["alice", "bob"]);

    let patch = ContactPatch::default().with_name("bob").with_phone("000");
    let err = store.update("alice", &patch).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(store.get("alice").unwrap().unwrap().phone, "phone");
    assert_eq!(store.get("bob").unwrap().unwrap().phone, "phone");
}

#[test]
fn test_update_missing() {
    let store = InMemoryStore::new();
    let err = store.update("ghost", &ContactPatch::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_inserts() {
    let store = Arc::new(InMemoryStore::new());

    let handles: Vec<_> = (0..200)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .insert(Contact::new(&format!("c{}", i), "p", "a"))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 200);
}

#[test]
fn test_concurrent_renames_never_lose_contacts() {
    let store = Arc::new(store_with(&["a0", "b0"]));

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|prefix| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    let from = format!("{}{}", prefix, i);
                    let to = format!("{}{}", prefix, i + 1);
                    let patch = ContactPatch::default().with_name(&to);
                    store.update(&from, &patch).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 2);
    assert!(store.get("a100").unwrap().is_some());
    assert!(store.get("b100").unwrap().is_some());
}
