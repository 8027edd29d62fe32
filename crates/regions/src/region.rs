use serde::{Deserialize, Serialize};

use tenantry_core::{DocumentId, Entity, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
}

/// A region (department/state) with its municipalities. Read-only over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: DocumentId,
    pub country: String,
    #[serde(default)]
    pub municipalities: Vec<Municipality>,
    pub name: String,
}

impl Entity for Region {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for Region {
    const COLLECTION: &'static str = "regions";
    const LABEL: &'static str = "Region";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantry_core::{Document, DomainError};

    fn doc(fields: serde_json::Value) -> Document {
        Document::new("antioquia".parse().unwrap(), fields.as_object().cloned().unwrap())
    }

    #[test]
    fn maps_nested_municipalities() {
        let region = Region::from_document(doc(json!({
            "country": "CO",
            "name": "Antioquia",
            "municipalities": [{ "name": "Medellín" }, { "name": "Envigado" }]
        })))
        .unwrap();
        assert_eq!(region.municipalities.len(), 2);
        assert_eq!(region.municipalities[0].name, "Medellín");
    }

    #[test]
    fn missing_municipalities_default_to_empty() {
        let region =
            Region::from_document(doc(json!({ "country": "CO", "name": "Amazonas" }))).unwrap();
        assert!(region.municipalities.is_empty());
    }

    #[test]
    fn malformed_document_reports_label_and_id() {
        let err = Region::from_document(doc(json!({ "country": 7 }))).unwrap_err();
        assert!(matches!(err, DomainError::Mapping(m) if m.starts_with("Region antioquia")));
    }
}
