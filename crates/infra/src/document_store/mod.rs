//! Document-store boundary.
//!
//! A document store keeps JSON-like documents in named collections, addressed
//! by a string id. Records are mapped on top of it by
//! [`crate::repository::Repository`].

pub mod codec;
pub mod firestore;
pub mod in_memory;
pub mod r#trait;

pub use firestore::{FirestoreDocumentStore, FirestoreSettings};
pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{DocumentStore, DocumentStoreError, FieldFilter};
