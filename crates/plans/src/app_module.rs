use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantry_core::{DocumentId, Entity, Record};

/// A functional module of the application (catalog entry, read-only over the API).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppModule {
    pub id: DocumentId,
    /// Identifier used by clients to gate features.
    pub api_name: String,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub name: String,
}

impl Entity for AppModule {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for AppModule {
    const COLLECTION: &'static str = "appModules";
    const LABEL: &'static str = "App module";
}
