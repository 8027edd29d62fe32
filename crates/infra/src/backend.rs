//! Shared clients for the document store and the identity provider.
//!
//! The backend is built once at startup and handed to the API explicitly.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;

use tenantry_auth::{IdentityProvider, PasswordSignIn, ProviderError};

use crate::config::{BackendConfig, BackendKind, FirebaseConfig};
use crate::document_store::{
    DocumentStore, DocumentStoreError, FirestoreDocumentStore, FirestoreSettings,
    InMemoryDocumentStore,
};
use crate::identity::{
    FixtureError, IdentityToolkitProvider, IdentityToolkitSettings, InMemoryIdentityProvider,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Fixtures(#[from] FixtureError),

    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    #[error("identity provider setup failed: {0}")]
    Identity(#[from] ProviderError),
}

#[derive(Clone)]
pub struct Backend {
    pub documents: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sign_in: Arc<dyn PasswordSignIn>,
}

impl core::fmt::Debug for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}

impl Backend {
    pub fn from_parts(
        documents: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        sign_in: Arc<dyn PasswordSignIn>,
    ) -> Self {
        Self {
            documents,
            identity,
            sign_in,
        }
    }

    /// In-memory backend; `identity` serves both verification and sign-in.
    pub fn in_memory(
        documents: Arc<InMemoryDocumentStore>,
        identity: Arc<InMemoryIdentityProvider>,
    ) -> Self {
        Self::from_parts(documents, identity.clone(), identity)
    }

    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        match &config.kind {
            BackendKind::Memory { identity_fixtures } => {
                let identity = match identity_fixtures {
                    Some(path) => {
                        tracing::info!(path = %path.display(), "loading identity fixtures");
                        InMemoryIdentityProvider::from_fixture_file(path)?
                    }
                    None => {
                        tracing::warn!("no identity fixtures; every token will be rejected");
                        InMemoryIdentityProvider::new()
                    }
                };
                Ok(Self::in_memory(
                    Arc::new(InMemoryDocumentStore::new()),
                    Arc::new(identity),
                ))
            }
            BackendKind::Firebase(fb) => Self::firebase(fb, config),
        }
    }

    fn firebase(fb: &FirebaseConfig, config: &BackendConfig) -> Result<Self, BackendError> {
        tracing::info!(
            project_id = %fb.project_id,
            database_id = %fb.database_id,
            firestore_emulator = fb.firestore_emulator_host.is_some(),
            auth_emulator = fb.auth_emulator_host.is_some(),
            "connecting firebase backend"
        );
        let documents = FirestoreDocumentStore::new(FirestoreSettings {
            project_id: fb.project_id.clone(),
            database_id: fb.database_id.clone(),
            emulator_host: fb.firestore_emulator_host.clone(),
            access_token: fb.access_token.clone(),
            timeout: config.request_timeout,
        })?;
        let identity = Arc::new(IdentityToolkitProvider::new(IdentityToolkitSettings {
            api_key: fb.api_key.clone(),
            emulator_host: fb.auth_emulator_host.clone(),
            timeout: config.request_timeout,
        })?);
        Ok(Self::from_parts(Arc::new(documents), identity.clone(), identity))
    }
}

/// Process-wide slot that initializes the backend at most once.
#[derive(Debug, Default)]
pub struct BackendCell {
    cell: OnceCell<Arc<Backend>>,
}

impl BackendCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Const constructor for `static` cells.
    pub const fn const_new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    pub fn get(&self) -> Option<Arc<Backend>> {
        self.cell.get().cloned()
    }

    /// Initialize with `init` unless already initialized; concurrent callers
    /// wait for the first initialization instead of building their own.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<Backend>, BackendError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Backend, BackendError>>,
    {
        self.cell
            .get_or_try_init(|| async { init().await.map(Arc::new) })
            .await
            .cloned()
    }

    pub async fn get_or_connect(
        &self,
        config: &BackendConfig,
    ) -> Result<Arc<Backend>, BackendError> {
        self.get_or_try_init(|| async { Backend::connect(config) }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REQUEST_TIMEOUT;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_config() -> BackendConfig {
        BackendConfig {
            kind: BackendKind::Memory { identity_fixtures: None },
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[tokio::test]
    async fn cell_initializes_once() {
        let cell = BackendCell::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let init = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Backend::connect(&memory_config())
        };

        let a = cell.get_or_try_init(init).await.unwrap();
        let b = cell.get_or_try_init(init).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.get().is_some());
    }

    #[tokio::test]
    async fn failed_initialization_can_be_retried() {
        let cell = BackendCell::new();
        let bad = BackendConfig {
            kind: BackendKind::Memory {
                identity_fixtures: Some("/definitely/not/here.json".into()),
            },
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        assert!(matches!(
            cell.get_or_connect(&bad).await,
            Err(BackendError::Fixtures(_))
        ));
        assert!(cell.get().is_none());
        assert!(cell.get_or_connect(&memory_config()).await.is_ok());
    }

    #[tokio::test]
    async fn memory_backend_answers_ping() {
        let backend = Backend::connect(&memory_config()).unwrap();
        backend.documents.ping().await.unwrap();
        assert!(backend.identity.verify("anything").await.is_err());
    }

    #[test]
    fn firebase_backend_builds_clients_without_network() {
        let config = BackendConfig {
            kind: BackendKind::Firebase(FirebaseConfig {
                project_id: "demo".into(),
                api_key: "k".into(),
                database_id: "(default)".into(),
                firestore_emulator_host: Some("localhost:8080".into()),
                auth_emulator_host: Some("localhost:9099".into()),
                access_token: None,
            }),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        assert!(Backend::connect(&config).is_ok());
    }
}
