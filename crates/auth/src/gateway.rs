//! Request authentication: header → credential → verified identity → principal.
//!
//! ```text
//! Unauthenticated ──header──▶ HeaderExtracted ──verify──▶ TokenVerified ──▶ PrincipalAttached
//!        │                          │                          │
//!        └── MissingCredential      └── MalformedCredential    └── provider failure (normalized)
//! ```
//!
//! `PrincipalAttached` and every rejection are terminal. The authenticator holds
//! no per-request state and can be shared across concurrent requests.

use std::sync::Arc;

use crate::credential::{Credential, parse_authorization};
use crate::error::AuthError;
use crate::identity::VerifiedIdentity;
use crate::principal::Principal;
use crate::provider::{IdentityProvider, normalize};

/// Stage of a single request inside the gateway.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthStage {
    Unauthenticated,
    HeaderExtracted,
    TokenVerified,
    PrincipalAttached,
}

impl AuthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStage::Unauthenticated => "unauthenticated",
            AuthStage::HeaderExtracted => "header_extracted",
            AuthStage::TokenVerified => "token_verified",
            AuthStage::PrincipalAttached => "principal_attached",
        }
    }
}

impl core::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Run the full gateway for one request.
    ///
    /// `authorization` is the raw `Authorization` header value, if present.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let outcome = match parse_authorization(authorization) {
            Ok(credential) => self.verify(&credential).await.map(Principal::from),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(principal) => {
                tracing::debug!(
                    uid = %principal.uid(),
                    stage = %AuthStage::PrincipalAttached,
                    "request authenticated"
                );
            }
            Err(e) => {
                tracing::warn!(stage = %e.stage(), code = e.code(), "request rejected");
            }
        }

        outcome
    }

    /// Verify a credential with the identity provider.
    ///
    /// The provider is called exactly once. Dropping the returned future drops
    /// the in-flight provider call.
    pub async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, AuthError> {
        self.provider.verify(credential.as_str()).await.map_err(|provider_err| {
            let err = normalize(&provider_err);
            if matches!(err, AuthError::AuthenticationFailed { .. }) {
                tracing::error!(
                    code = %provider_err.code,
                    message = %provider_err.message,
                    "unhandled identity provider error"
                );
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::identity::ClaimSet;
    use crate::provider::ProviderError;

    #[derive(Default)]
    struct FakeProvider {
        tokens: HashMap<String, Result<VerifiedIdentity, ProviderError>>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn with(mut self, token: &str, outcome: Result<VerifiedIdentity, ProviderError>) -> Self {
            self.tokens.insert(token.to_string(), outcome);
            self
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tokens
                .get(token)
                .cloned()
                .unwrap_or_else(|| Err(ProviderError::new("auth/argument-error", "unknown token")))
        }
    }

    fn identity(uid: &str) -> VerifiedIdentity {
        let mut claims = ClaimSet::new();
        claims.insert("sub".into(), json!(uid));
        claims.insert("aud".into(), json!("test-project"));
        VerifiedIdentity::new(uid).with_email("a@b.com", true).with_claims(claims)
    }

    fn authenticator(provider: FakeProvider) -> (Authenticator, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (Authenticator::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn missing_header_never_reaches_the_provider() {
        let (auth, provider) = authenticator(FakeProvider::default());
        assert_eq!(auth.authenticate(None).await, Err(AuthError::MissingCredential));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_header_never_reaches_the_provider() {
        let (auth, provider) = authenticator(FakeProvider::default());
        for header in ["Token abc", "Bearer", "Bearer  "] {
            assert_eq!(
                auth.authenticate(Some(header)).await,
                Err(AuthError::MalformedCredential)
            );
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verified_subject_becomes_the_principal() {
        let (auth, provider) =
            authenticator(FakeProvider::default().with("tok", Ok(identity("u123"))));

        let principal = auth.authenticate(Some("Bearer tok")).await.unwrap();
        assert_eq!(principal.uid().as_str(), "u123");
        assert_eq!(principal.email.as_deref(), Some("a@b.com"));
        assert_eq!(principal.claims()["sub"], "u123");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn verification_is_idempotent_across_requests() {
        let (auth, _) = authenticator(FakeProvider::default().with("tok", Ok(identity("u1"))));

        let first = auth.authenticate(Some("Bearer tok")).await.unwrap();
        let second = auth.authenticate(Some("Bearer tok")).await.unwrap();
        assert_eq!(first.uid(), second.uid());
        assert_eq!(first.claims(), second.claims());
    }

    #[tokio::test]
    async fn expiry_is_normalized() {
        let (auth, _) = authenticator(FakeProvider::default().with(
            "old",
            Err(ProviderError::new("auth/id-token-expired", "Firebase ID token has expired.")),
        ));
        let err = auth.authenticate(Some("Bearer old")).await.unwrap_err();
        assert_eq!(err, AuthError::CredentialExpired);
        assert_eq!(err.code(), "auth/id-token-expired");
    }

    #[tokio::test]
    async fn unrecognized_provider_codes_degrade_gracefully() {
        let (auth, provider) = authenticator(FakeProvider::default());
        let err = auth.authenticate(Some("Bearer nope")).await.unwrap_err();
        assert_eq!(
            err,
            AuthError::AuthenticationFailed { code: "auth/argument-error".into() }
        );
        // No silent retry.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
