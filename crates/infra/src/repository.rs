//! Typed CRUD over a [`DocumentStore`] collection.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use tenantry_core::{DocumentId, DomainError, Draft, Patch, Record};

use crate::document_store::{DocumentStore, DocumentStoreError, FieldFilter};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

/// Repository for records of type `R`, stored in `R::COLLECTION`.
pub struct Repository<R> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> core::fmt::Debug for Repository<R>
where
    R: Record,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &R::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Repository<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn create<D>(&self, draft: D) -> Result<R, RepositoryError>
    where
        D: Draft<Record = R>,
    {
        draft.validate()?;
        let fields = draft.into_fields(Utc::now())?;
        let doc = self.store.add(R::COLLECTION, fields).await?;
        tracing::info!(collection = R::COLLECTION, id = %doc.id, "created");
        Ok(R::from_document(doc)?)
    }

    pub async fn find_all(&self) -> Result<Vec<R>, RepositoryError> {
        self.query(&[]).await
    }

    /// Records whose top-level `field` equals `value`.
    pub async fn find_by(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<R>, RepositoryError> {
        self.query(&[FieldFilter::eq(field, value)]).await
    }

    pub async fn query(&self, filters: &[FieldFilter]) -> Result<Vec<R>, RepositoryError> {
        let docs = self.store.query(R::COLLECTION, filters).await?;
        tracing::debug!(collection = R::COLLECTION, count = docs.len(), "listed");
        docs.into_iter()
            .map(|d| R::from_document(d).map_err(RepositoryError::from))
            .collect()
    }

    pub async fn find_one(&self, id: &DocumentId) -> Result<R, RepositoryError> {
        match self.store.get(R::COLLECTION, id).await? {
            Some(doc) => Ok(R::from_document(doc)?),
            None => {
                tracing::warn!(collection = R::COLLECTION, %id, "{} not found", R::LABEL);
                Err(DomainError::NotFound.into())
            }
        }
    }

    pub async fn update<P>(&self, id: &DocumentId, patch: P) -> Result<R, RepositoryError>
    where
        P: Patch<Record = R>,
    {
        patch.validate()?;
        let fields = patch.into_fields()?;
        match self.store.update(R::COLLECTION, id, fields).await? {
            Some(doc) => {
                tracing::info!(collection = R::COLLECTION, %id, "updated");
                Ok(R::from_document(doc)?)
            }
            None => {
                tracing::warn!(
                    collection = R::COLLECTION,
                    %id,
                    "{} not found for update",
                    R::LABEL
                );
                Err(DomainError::NotFound.into())
            }
        }
    }

    pub async fn remove(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        if self.store.delete(R::COLLECTION, id).await? {
            tracing::info!(collection = R::COLLECTION, %id, "removed");
            Ok(())
        } else {
            tracing::warn!(collection = R::COLLECTION, %id, "{} not found for removal", R::LABEL);
            Err(DomainError::NotFound.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::InMemoryDocumentStore;
    use serde_json::json;
    use tenantry_companies::{
        Company, CompanyModule, CreateCompany, CreateCompanyModule, UpdateCompany,
    };

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(InMemoryDocumentStore::new())
    }

    fn company_draft(name: &str) -> CreateCompany {
        serde_json::from_value(json!({
            "city": "Cali",
            "companyName": name,
            "country": "CO",
            "nit": "1",
            "phone": "2",
            "region": "Valle"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn crud_lifecycle() {
        let repo = Repository::<Company>::new(store());

        let created = repo.create(company_draft("Acme")).await.unwrap();
        assert!(created.is_active);

        let fetched = repo.find_one(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        let patch = UpdateCompany { city: Some("Bogotá".into()), ..Default::default() };
        let updated = repo.update(&created.id, patch).await.unwrap();
        assert_eq!(updated.city, "Bogotá");
        assert_eq!(updated.company_name, "Acme");

        repo.remove(&created.id).await.unwrap();
        assert!(matches!(
            repo.find_one(&created.id).await,
            Err(RepositoryError::Domain(DomainError::NotFound))
        ));
        assert!(matches!(
            repo.remove(&created.id).await,
            Err(RepositoryError::Domain(DomainError::NotFound))
        ));
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_store() {
        let s = store();
        let repo = Repository::<Company>::new(s.clone());
        assert!(matches!(
            repo.create(company_draft(" ")).await,
            Err(RepositoryError::Domain(DomainError::Validation(_)))
        ));
        assert!(s.query(Company::COLLECTION, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_filters_on_a_field() {
        let repo = Repository::<CompanyModule>::new(store());
        for company in ["c1", "c1", "c2"] {
            let draft: CreateCompanyModule = serde_json::from_value(json!({
                "additionalModulePrice": 0.0,
                "idAppModule": "m1",
                "idCompany": company,
                "isAdditionalModule": false,
                "isUnlimitedRegisters": true,
                "registersLimitCompany": 0,
                "registersLimitPlan": 0
            }))
            .unwrap();
            repo.create(draft).await.unwrap();
        }
        assert_eq!(repo.find_by("idCompany", "c1").await.unwrap().len(), 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unmappable_documents_surface_as_mapping_errors() {
        let s = Arc::new(InMemoryDocumentStore::new());
        s.insert(
            Company::COLLECTION,
            "broken".parse().unwrap(),
            json!({ "city": 5 }).as_object().cloned().unwrap(),
        )
        .unwrap();
        let repo = Repository::<Company>::new(s);
        let err = repo.find_one(&"broken".parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Domain(DomainError::Mapping(_))));
    }
}
