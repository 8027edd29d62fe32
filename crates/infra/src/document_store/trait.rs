use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use tenantry_core::{Document, DocumentId, Fields};

/// Equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `fields` satisfies this filter.
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Document store operation error.
///
/// These are infrastructure failures; a missing document is not an error and
/// is reported through `Option`/`bool` results instead.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The store could not be reached.
    #[error("document store transport error: {0}")]
    Transport(String),

    /// The store answered with an error status.
    #[error("document store returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The store answered with a payload that could not be decoded.
    #[error("document store payload could not be decoded: {0}")]
    Decode(String),
}

/// Collection-oriented document store.
///
/// Implementations must:
/// - assign a fresh id on `add`
/// - merge top-level fields on `update` and leave the others untouched
/// - report a missing document as `None`/`false`, never as an error
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError>;

    async fn add(&self, collection: &str, fields: Fields) -> Result<Document, DocumentStoreError>;

    /// Merge `fields` into an existing document and return the stored result.
    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, DocumentStoreError>;

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError>;

    /// Documents matching every filter (all documents when `filters` is empty).
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), DocumentStoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        (**self).get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<Document, DocumentStoreError> {
        (**self).add(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, DocumentStoreError> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        (**self).delete(collection, id).await
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        (**self).query(collection, filters).await
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        (**self).ping().await
    }
}
