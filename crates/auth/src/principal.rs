use std::sync::Arc;

use serde::Serialize;

use crate::identity::{ClaimSet, VerifiedIdentity};

/// Identity of an authenticated principal, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PrincipalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The verified identity attached to a request for downstream handlers.
///
/// Built once per request from a [`VerifiedIdentity`] and dropped with the
/// request. The raw claim set is shared, not copied, so handlers that need
/// provider-specific claims can read them cheaply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub uid: PrincipalId,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub claims: Arc<ClaimSet>,
}

impl Principal {
    pub fn uid(&self) -> &PrincipalId {
        &self.uid
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }
}

impl From<VerifiedIdentity> for Principal {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            uid: PrincipalId::new(identity.uid),
            email: identity.email,
            email_verified: identity.email_verified,
            name: identity.name,
            picture: identity.picture,
            claims: Arc::new(identity.claims),
        }
    }
}
