//! Infrastructure layer: configuration, document store, identity provider
//! clients and the typed repository built on top of them.

pub mod backend;
pub mod config;
pub mod document_store;
pub mod identity;
pub mod repository;

pub use backend::{Backend, BackendCell, BackendError};
pub use config::{BackendConfig, BackendKind, ConfigError, FirebaseConfig};
pub use repository::{Repository, RepositoryError};
