//! Mapping between document-store documents and typed records.
//!
//! A document is an id plus a JSON object of fields. A [`Record`] is the typed
//! projection of one document in a named collection; [`Draft`] and [`Patch`]
//! are the create/update payloads that turn back into fields.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::DocumentId;

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, Value>;

/// A document as returned by the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }
}

/// Typed projection of a document in [`Record::COLLECTION`].
pub trait Record:
    Entity<Id = DocumentId> + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection the records live in.
    const COLLECTION: &'static str;

    /// Human label used in messages ("Company with ID .. not found").
    const LABEL: &'static str;

    /// Map a stored document to the record.
    ///
    /// The document id is merged into the fields as `id` before
    /// deserialization, so records declare `id` like any other field.
    fn from_document(doc: Document) -> DomainResult<Self> {
        let Document { id, mut fields } = doc;
        let id_str = id.to_string();
        fields.insert("id".to_string(), Value::String(id_str.clone()));
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| DomainError::mapping(format!("{} {}: {}", Self::LABEL, id_str, e)))
    }
}

/// Create payload for a record.
pub trait Draft: DeserializeOwned + Send + 'static {
    type Record: Record;

    fn validate(&self) -> DomainResult<()>;

    /// Fields to store for a new document (server-managed defaults applied).
    fn into_fields(self, created_at: DateTime<Utc>) -> DomainResult<Fields>;
}

/// Partial update payload for a record.
pub trait Patch: Serialize + DeserializeOwned + Send + 'static {
    type Record: Record;

    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    /// Fields to merge into the stored document. Absent fields are left as-is.
    fn into_fields(self) -> DomainResult<Fields> {
        let fields = to_fields(&self)?;
        if fields.is_empty() {
            return Err(DomainError::validation("update contains no fields"));
        }
        Ok(fields)
    }
}

/// Serialize `value` into top-level fields, dropping `null` entries.
pub fn to_fields<T: Serialize>(value: &T) -> DomainResult<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(mut map)) => {
            map.retain(|_k, v| !v.is_null());
            Ok(map)
        }
        Ok(other) => Err(DomainError::mapping(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(DomainError::mapping(e.to_string())),
    }
}

/// Field holding the server-assigned creation timestamp.
pub const CREATED_DATE_FIELD: &str = "createdDate";

/// Top-level fields persisted as native store timestamps rather than strings.
pub const TIMESTAMP_FIELDS: &[&str] = &[CREATED_DATE_FIELD, "startDate", "endDate"];

/// Set [`CREATED_DATE_FIELD`] on a new document's fields.
pub fn stamp_created(fields: &mut Fields, created_at: DateTime<Utc>) -> DomainResult<()> {
    let value = serde_json::to_value(created_at).map_err(|e| DomainError::mapping(e.to_string()))?;
    fields.insert(CREATED_DATE_FIELD.to_string(), value);
    Ok(())
}

/// Reject empty or whitespace-only required strings.
pub fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject negative or non-finite amounts.
pub fn require_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Shallow e-mail shape check (`local@domain.tld`).
pub fn require_email(field: &str, value: &str) -> DomainResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!("{field} must be a valid email")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        id: DocumentId,
        name: String,
        #[serde(default)]
        is_active: bool,
    }

    impl Entity for Widget {
        type Id = DocumentId;

        fn id(&self) -> &DocumentId {
            &self.id
        }
    }

    impl Record for Widget {
        const COLLECTION: &'static str = "widgets";
        const LABEL: &'static str = "Widget";
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct UpdateWidget {
        name: Option<String>,
        is_active: Option<bool>,
    }

    impl Patch for UpdateWidget {
        type Record = Widget;
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn from_document_merges_id_and_applies_defaults() {
        let doc = Document::new(
            "w1".parse().unwrap(),
            fields(serde_json::json!({ "name": "gear" })),
        );
        let w = Widget::from_document(doc).unwrap();
        assert_eq!(w.id.as_str(), "w1");
        assert_eq!(w.name, "gear");
        assert!(!w.is_active);
    }

    #[test]
    fn from_document_reports_mapping_errors_with_label() {
        let doc = Document::new("w2".parse().unwrap(), fields(serde_json::json!({ "name": 3 })));
        match Widget::from_document(doc) {
            Err(DomainError::Mapping(msg)) => assert!(msg.starts_with("Widget w2")),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn patch_drops_absent_fields_and_rejects_empty_updates() {
        let patch = UpdateWidget { name: Some("cog".into()), is_active: None };
        let f = patch.into_fields().unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(f["name"], "cog");

        let empty = UpdateWidget { name: None, is_active: None };
        assert!(matches!(empty.into_fields(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn email_shape_check() {
        assert!(require_email("email", "a@b.com").is_ok());
        assert!(require_email("email", "a@b").is_err());
        assert!(require_email("email", "@b.com").is_err());
        assert!(require_email("email", "a b@c.com").is_err());
        assert!(require_email("email", "a@b@c.com").is_err());
    }

    #[test]
    fn amounts_must_be_non_negative() {
        assert!(require_non_negative("price", 0.0).is_ok());
        assert!(require_non_negative("price", -1.0).is_err());
        assert!(require_non_negative("price", f64::NAN).is_err());
    }
}
