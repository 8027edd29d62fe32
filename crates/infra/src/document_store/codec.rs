//! JSON ⇄ Firestore typed-value codec.
//!
//! Firestore's REST surface wraps every value in a single-key object naming its
//! type (`{"stringValue": "x"}`, `{"integerValue": "7"}`, ...). Integers travel
//! as strings. Timestamps, references and bytes decode to plain strings.
//!
//! On the way in, the top-level fields named in [`TIMESTAMP_FIELDS`] are sent
//! as `timestampValue` when they hold an RFC 3339 string.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value, json};

use tenantry_core::record::TIMESTAMP_FIELDS;
use tenantry_core::{Document, DocumentId, Fields};

use super::r#trait::DocumentStoreError;

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => match n.as_u64() {
                Some(u) => json!({ "integerValue": u.to_string() }),
                None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
            },
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> =
                map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Encode the top-level field `name`.
pub fn encode_field(name: &str, value: &Value) -> Value {
    if TIMESTAMP_FIELDS.contains(&name) {
        if let Some(ts) = value.as_str().and_then(as_timestamp) {
            return json!({ "timestampValue": ts });
        }
    }
    encode_value(value)
}

pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_field(k, v)))
            .collect(),
    )
}

fn as_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub fn decode_value(value: &Value) -> Result<Value, DocumentStoreError> {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Err(DocumentStoreError::Decode(format!(
            "expected a typed value, got {value}"
        )));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| bad(kind, inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| bad(kind, inner))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::Number(n) => n.as_f64(),
                // NaN and the infinities arrive as strings.
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            Ok(parsed.and_then(Number::from_f64).map_or(Value::Null, Value::Number))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| bad(kind, inner)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let items = match inner.get("values") {
                Some(Value::Array(items)) => items,
                None => return Ok(Value::Array(vec![])),
                Some(other) => return Err(bad(kind, other)),
            };
            items
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => decode_fields(fields).map(Value::Object),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(DocumentStoreError::Decode(format!(
            "unsupported value type {other}"
        ))),
    }
}

pub fn decode_fields(fields: &Value) -> Result<Fields, DocumentStoreError> {
    let Some(map) = fields.as_object() else {
        return Err(DocumentStoreError::Decode(format!(
            "expected a fields object, got {fields}"
        )));
    };
    map.iter()
        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
        .collect()
}

/// Decode a REST document resource (`{name, fields, createTime, updateTime}`).
///
/// The id is the last segment of the resource name.
pub fn decode_document(resource: &Value) -> Result<Document, DocumentStoreError> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| DocumentStoreError::Decode("document without a name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name);
    let id = DocumentId::new(id).map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
    let fields = match resource.get("fields") {
        Some(fields) => decode_fields(fields)?,
        None => Fields::new(),
    };
    Ok(Document::new(id, fields))
}

fn bad(kind: &str, inner: &Value) -> DocumentStoreError {
    DocumentStoreError::Decode(format!("malformed {kind}: {inner}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scalars_with_type_tags() {
        assert_eq!(encode_value(&json!(7)), json!({ "integerValue": "7" }));
        assert_eq!(encode_value(&json!(1.5)), json!({ "doubleValue": 1.5 }));
        assert_eq!(encode_value(&json!("x")), json!({ "stringValue": "x" }));
        assert_eq!(encode_value(&json!(null)), json!({ "nullValue": null }));
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
    }

    #[test]
    fn date_fields_encode_as_timestamps() {
        let mut fields = Fields::new();
        let created = "2025-03-04T05:06:07.123Z".parse::<DateTime<Utc>>().unwrap();
        tenantry_core::record::stamp_created(&mut fields, created).unwrap();
        fields.insert("startDate".into(), json!("2025-01-01T00:00:00+02:00"));
        fields.insert("endDate".into(), json!("not a date"));
        fields.insert("note".into(), json!("2025-01-01T00:00:00Z"));

        let encoded = encode_fields(&fields);
        assert_eq!(
            encoded["createdDate"],
            json!({ "timestampValue": "2025-03-04T05:06:07.123Z" })
        );
        assert_eq!(
            encoded["startDate"],
            json!({ "timestampValue": "2024-12-31T22:00:00Z" })
        );
        assert_eq!(encoded["endDate"], json!({ "stringValue": "not a date" }));
        assert_eq!(encoded["note"], json!({ "stringValue": "2025-01-01T00:00:00Z" }));
    }

    #[test]
    fn nested_values_survive_a_round_trip() {
        let original = json!({
            "name": "Antioquia",
            "municipalities": [{ "name": "Medellín" }, { "name": "Envigado" }],
            "limits": { "registers": 10, "price": 2.5, "unlimited": false },
            "empty": []
        });
        let fields = original.as_object().cloned().unwrap();
        let decoded = decode_fields(&encode_fields(&fields)).unwrap();
        assert_eq!(Value::Object(decoded), original);
    }

    #[test]
    fn decodes_server_only_types() {
        let fields = json!({
            "createdDate": { "timestampValue": "2025-01-01T00:00:00.123456Z" },
            "owner": { "referenceValue": "projects/p/databases/(default)/documents/users/u1" },
            "noValues": { "arrayValue": {} },
            "emptyMap": { "mapValue": {} }
        });
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["createdDate"], "2025-01-01T00:00:00.123456Z");
        assert_eq!(decoded["noValues"], json!([]));
        assert_eq!(decoded["emptyMap"], json!({}));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(decode_value(&json!({ "integerValue": "seven" })).is_err());
        assert!(decode_value(&json!({ "mysteryValue": 1 })).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn document_id_is_last_name_segment() {
        let doc = decode_document(&json!({
            "name": "projects/p/databases/(default)/documents/companies/abc123",
            "fields": { "city": { "stringValue": "Cali" } }
        }))
        .unwrap();
        assert_eq!(doc.id.as_str(), "abc123");
        assert_eq!(doc.fields["city"], "Cali");
    }
}
