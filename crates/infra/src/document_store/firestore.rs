//! Firestore REST (v1) document store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};

use tenantry_core::{Document, DocumentId, Fields};

use super::codec::{decode_document, encode_field, encode_fields};
use super::r#trait::{DocumentStore, DocumentStoreError, FieldFilter};

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com";

/// Emulators accept this token as an administrator credential.
const EMULATOR_OWNER_TOKEN: &str = "owner";

#[derive(Debug, Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub database_id: String,
    /// `host:port` of a local emulator; plain HTTP is used when set.
    pub emulator_host: Option<String>,
    /// OAuth2 access token sent as a bearer credential.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    http: Client,
    /// `.../v1/projects/{p}/databases/{d}/documents`
    base_url: String,
    bearer: Option<String>,
}

impl FirestoreDocumentStore {
    pub fn new(settings: FirestoreSettings) -> Result<Self, DocumentStoreError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))?;

        let host = match &settings.emulator_host {
            Some(h) => format!("http://{h}"),
            None => FIRESTORE_HOST.to_string(),
        };
        let bearer = settings.access_token.clone().or_else(|| {
            settings
                .emulator_host
                .as_ref()
                .map(|_| EMULATOR_OWNER_TOKEN.to_string())
        });

        Ok(Self {
            http,
            base_url: format!(
                "{host}/v1/projects/{}/databases/{}/documents",
                settings.project_id, settings.database_id
            ),
            bearer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn document_url(&self, collection: &str, id: &DocumentId) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, DocumentStoreError> {
        builder
            .send()
            .await
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))
    }

    async fn json(response: Response) -> Result<Value, DocumentStoreError> {
        let status = response.status();
        if !status.is_success() {
            return Err(backend_error(response).await);
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))
    }
}

async fn backend_error(response: Response) -> DocumentStoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or(body);
    DocumentStoreError::Backend { status, message }
}

/// Quote a field path segment unless it is a simple identifier.
fn field_path(field: &str) -> String {
    let simple = field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn structured_query(collection: &str, filters: &[FieldFilter]) -> Value {
    let mut conditions: Vec<Value> = filters
        .iter()
        .map(|f| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": field_path(&f.field) },
                    "op": "EQUAL",
                    "value": encode_field(&f.field, &f.value),
                }
            })
        })
        .collect();

    let mut query = json!({ "from": [{ "collectionId": collection }] });
    let filter = match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": conditions } })),
    };
    if let (Some(filter), Some(obj)) = (filter, query.as_object_mut()) {
        obj.insert("where".to_string(), filter);
    }
    json!({ "structuredQuery": query })
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let response = self
            .send(self.request(Method::GET, self.document_url(collection, id)))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = Self::json(response).await?;
        decode_document(&body).map(Some)
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<Document, DocumentStoreError> {
        let url = format!("{}/{}", self.base_url, collection);
        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;
        decode_document(&Self::json(response).await?)
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", field_path(k)))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .send(
                self.request(Method::PATCH, self.document_url(collection, id))
                    .query(&params)
                    .json(&body),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode_document(&Self::json(response).await?).map(Some)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        let response = self
            .send(
                self.request(Method::DELETE, self.document_url(collection, id))
                    .query(&[("currentDocument.exists", "true")]),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::json(response).await?;
        Ok(true)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let url = format!("{}:runQuery", self.base_url);
        let response = self
            .send(
                self.request(Method::POST, url)
                    .json(&structured_query(collection, filters)),
            )
            .await?;
        let body = Self::json(response).await?;
        let Some(results) = body.as_array() else {
            return Err(DocumentStoreError::Decode(format!(
                "runQuery returned {body}"
            )));
        };
        // Entries without a document only carry progress metadata.
        results
            .iter()
            .filter_map(|r| r.get("document"))
            .map(decode_document)
            .collect()
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        let url = format!("{}:listCollectionIds", self.base_url);
        let response = self
            .send(
                self.request(Method::POST, url)
                    .json(&json!({ "pageSize": 1 })),
            )
            .await?;
        Self::json(response).await.map(|_| ())
    }
}
