//! Identity-provider boundary and error-code normalization.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AuthError, UNKNOWN_ERROR_CODE};
use crate::identity::VerifiedIdentity;

/// Structured failure reported by an identity provider.
///
/// `code` is in the provider's own vocabulary (e.g. `auth/id-token-expired`);
/// it is translated by [`normalize`] before anything leaves the gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// External service that verifies bearer credentials.
///
/// Implementations own any caching, key rotation or rate limiting. The gateway
/// awaits `verify` once per request and never retries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError>;
}

/// Exchange of e-mail/password credentials for an ID token.
#[async_trait]
pub trait PasswordSignIn: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<String, ProviderError>;
}

/// Translate a provider failure into the gateway's taxonomy.
///
/// The provider's message text never influences the result; only its code.
pub fn normalize(err: &ProviderError) -> AuthError {
    match err.code.as_str() {
        // `td-token-expired` is a misspelling some clients still send.
        "auth/id-token-expired" | "auth/td-token-expired" => AuthError::CredentialExpired,
        "auth/id-token-revoked" => AuthError::CredentialRevoked,
        "auth/invalid-id-token" => AuthError::CredentialInvalid,
        "auth/project-not-found" | "auth/tenant-not-found" => AuthError::TenantNotFound,
        "auth/user-not-found" => AuthError::PrincipalNotFound,
        "" => AuthError::AuthenticationFailed {
            code: UNKNOWN_ERROR_CODE.to_string(),
        },
        other => AuthError::AuthenticationFailed {
            code: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_for(code: &str) -> AuthError {
        normalize(&ProviderError::new(code, "whatever the provider said"))
    }

    #[test]
    fn known_codes_map_to_dedicated_kinds() {
        assert_eq!(kind_for("auth/id-token-expired"), AuthError::CredentialExpired);
        assert_eq!(kind_for("auth/td-token-expired"), AuthError::CredentialExpired);
        assert_eq!(kind_for("auth/id-token-revoked"), AuthError::CredentialRevoked);
        assert_eq!(kind_for("auth/invalid-id-token"), AuthError::CredentialInvalid);
        assert_eq!(kind_for("auth/project-not-found"), AuthError::TenantNotFound);
        assert_eq!(kind_for("auth/tenant-not-found"), AuthError::TenantNotFound);
        assert_eq!(kind_for("auth/user-not-found"), AuthError::PrincipalNotFound);
    }

    #[test]
    fn expiry_code_is_stable_regardless_of_message() {
        for message in ["", "Firebase ID token has expired", "exp claim in the past"] {
            let err = normalize(&ProviderError::new("auth/id-token-expired", message));
            assert_eq!(err, AuthError::CredentialExpired);
            assert_eq!(err.code(), "auth/id-token-expired");
        }
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let err = kind_for("auth/user-disabled");
        assert_eq!(
            err,
            AuthError::AuthenticationFailed { code: "auth/user-disabled".into() }
        );
        assert_eq!(err.code(), "auth/user-disabled");
        assert_eq!(err.message(), "Authentication failed");
    }

    #[test]
    fn missing_code_becomes_unknown_error() {
        assert_eq!(kind_for("").code(), "auth/unknown-error");
    }
}
