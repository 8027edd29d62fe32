use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use tenantry_core::{Document, DocumentId, Fields};

use super::r#trait::{DocumentStore, DocumentStoreError, FieldFilter};

type Collection = BTreeMap<DocumentId, Fields>;

/// In-memory document store.
///
/// Intended for tests/dev. Documents are listed in id order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

fn poisoned() -> DocumentStoreError {
    DocumentStoreError::Transport("lock poisoned".to_string())
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fields` under a caller-chosen id, replacing any existing document.
    pub fn insert(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, fields);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone())))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<Document, DocumentStoreError> {
        let id = DocumentId::new(Uuid::now_v7().simple().to_string())
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
        self.insert(collection, id.clone(), fields.clone())?;
        Ok(Document::new(id, fields))
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let Some(stored) = collections.get_mut(collection).and_then(|c| c.get_mut(id)) else {
            return Ok(None);
        };
        stored.extend(fields);
        Ok(Some(Document::new(id.clone(), stored.clone())))
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        Ok(collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some())
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let Some(docs) = collections.get(collection) else {
            return Ok(vec![]);
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        self.collections.read().map_err(|_| poisoned())?;
        Ok(())
    }
}
