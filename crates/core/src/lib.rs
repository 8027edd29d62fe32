//! `tenantry-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! document identifiers, the domain error model, and the traits that map
//! document-store documents to typed records.

pub mod entity;
pub mod error;
pub mod id;
pub mod record;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::DocumentId;
pub use record::{Document, Draft, Fields, Patch, Record};
