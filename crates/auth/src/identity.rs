//! Result of a successful credential verification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::ProviderError;

/// Raw claims asserted by the identity provider about a subject.
pub type ClaimSet = serde_json::Map<String, Value>;

/// Identity returned by the provider for a verified credential.
///
/// Immutable once constructed; owned by the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Stable subject identifier.
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub claims: ClaimSet,
}

impl VerifiedIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            email_verified: None,
            name: None,
            picture: None,
            claims: ClaimSet::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>, verified: bool) -> Self {
        self.email = Some(email.into());
        self.email_verified = Some(verified);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn with_claims(mut self, claims: ClaimSet) -> Self {
        self.claims = claims;
        self
    }

    /// Build an identity from a decoded ID-token claim set.
    ///
    /// The subject is read from `uid`, then `user_id`, then `sub`. A claim set
    /// without a non-empty subject is not a valid identity.
    pub fn from_claims(claims: ClaimSet) -> Result<Self, ProviderError> {
        let uid = ["uid", "user_id", "sub"]
            .iter()
            .find_map(|k| claims.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                ProviderError::new("auth/invalid-id-token", "claim set has no subject")
            })?;

        let string_claim = |k: &str| claims.get(k).and_then(Value::as_str).map(str::to_owned);

        Ok(Self {
            uid,
            email: string_claim("email"),
            email_verified: claims.get("email_verified").and_then(Value::as_bool),
            name: string_claim("name"),
            picture: string_claim("picture"),
            claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> ClaimSet {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn reads_standard_claims() {
        let id = VerifiedIdentity::from_claims(claims(json!({
            "sub": "u1",
            "user_id": "u1",
            "email": "a@b.com",
            "email_verified": true,
            "name": "Ada",
            "picture": "https://example.com/a.png",
            "firebase": { "sign_in_provider": "password" }
        })))
        .unwrap();

        assert_eq!(id.uid, "u1");
        assert_eq!(id.email.as_deref(), Some("a@b.com"));
        assert_eq!(id.email_verified, Some(true));
        assert_eq!(id.name.as_deref(), Some("Ada"));
        assert_eq!(id.claims["firebase"]["sign_in_provider"], "password");
    }

    #[test]
    fn prefers_uid_over_sub() {
        let id = VerifiedIdentity::from_claims(claims(json!({ "uid": "a", "sub": "b" }))).unwrap();
        assert_eq!(id.uid, "a");
    }

    #[test]
    fn missing_subject_is_invalid() {
        let err = VerifiedIdentity::from_claims(claims(json!({ "email": "a@b.com" }))).unwrap_err();
        assert_eq!(err.code, "auth/invalid-id-token");

        let err = VerifiedIdentity::from_claims(claims(json!({ "sub": "" }))).unwrap_err();
        assert_eq!(err.code, "auth/invalid-id-token");
    }
}
