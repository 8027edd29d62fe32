//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Upper bound on a document id, in bytes.
pub const MAX_DOCUMENT_ID_LEN: usize = 1500;

/// Identifier of a document inside a collection.
///
/// Ids are assigned by the document store on insert and are opaque strings.
/// They must be non-empty, must not contain `/` (which would address a nested
/// path) and must fit in [`MAX_DOCUMENT_ID_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::invalid_id("DocumentId: empty"));
        }
        if value.contains('/') {
            return Err(DomainError::invalid_id(format!(
                "DocumentId: '{value}' contains '/'"
            )));
        }
        if value.len() > MAX_DOCUMENT_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "DocumentId: longer than {MAX_DOCUMENT_ID_LEN} bytes"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_ids() {
        let id: DocumentId = "a1B2c3".parse().unwrap();
        assert_eq!(id.as_str(), "a1B2c3");
        assert_eq!(id.to_string(), "a1B2c3");
    }

    #[test]
    fn rejects_empty_and_nested_paths() {
        assert!(matches!("".parse::<DocumentId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!(
            "companies/abc".parse::<DocumentId>(),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn rejects_oversized_ids() {
        let long = "x".repeat(MAX_DOCUMENT_ID_LEN + 1);
        assert!(DocumentId::new(long).is_err());
        assert!(DocumentId::new("x".repeat(MAX_DOCUMENT_ID_LEN)).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: DocumentId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(ok.as_str(), "abc");
        assert!(serde_json::from_str::<DocumentId>("\"a/b\"").is_err());
    }
}
