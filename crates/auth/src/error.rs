//! Gateway error taxonomy.
//!
//! Every rejection the gateway produces is one of these kinds. Provider error
//! shapes never leave the crate; see [`crate::provider::normalize`].

use serde::Serialize;
use thiserror::Error;

use crate::gateway::AuthStage;

/// Prefix shared by every gateway error code.
pub const CODE_PREFIX: &str = "auth";

/// Code used when the provider reported a failure without a code.
pub const UNKNOWN_ERROR_CODE: &str = "auth/unknown-error";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingCredential,

    #[error("authorization header is not of the form 'Bearer <token>'")]
    MalformedCredential,

    #[error("credential has expired")]
    CredentialExpired,

    #[error("credential has been revoked")]
    CredentialRevoked,

    #[error("credential is invalid")]
    CredentialInvalid,

    #[error("identity project not found")]
    TenantNotFound,

    #[error("principal not found")]
    PrincipalNotFound,

    /// Any provider failure without a dedicated kind. `code` is the provider's
    /// own code (or [`UNKNOWN_ERROR_CODE`]) and is surfaced to the caller.
    #[error("authentication failed ({code})")]
    AuthenticationFailed { code: String },
}

impl AuthError {
    /// Machine-readable code, stable across providers.
    pub fn code(&self) -> &str {
        match self {
            AuthError::MissingCredential => "auth/missing-header",
            AuthError::MalformedCredential => "auth/malformed-header",
            AuthError::CredentialExpired => "auth/id-token-expired",
            AuthError::CredentialRevoked => "auth/id-token-revoked",
            AuthError::CredentialInvalid => "auth/invalid-id-token",
            AuthError::TenantNotFound => "auth/project-not-found",
            AuthError::PrincipalNotFound => "auth/user-not-found",
            AuthError::AuthenticationFailed { code } => code,
        }
    }

    /// Human-readable message returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "Authorization header is required",
            AuthError::MalformedCredential => {
                "Invalid authorization header format. Expected: Bearer <token>"
            }
            AuthError::CredentialExpired => {
                "ID token has expired. Get a fresh ID token from your client app and try again"
            }
            AuthError::CredentialRevoked => "Token has been revoked",
            AuthError::CredentialInvalid => "Invalid token format or signature",
            AuthError::TenantNotFound => "Identity project not found",
            AuthError::PrincipalNotFound => "User not found",
            AuthError::AuthenticationFailed { .. } => "Authentication failed",
        }
    }

    /// The gateway stage this error rejects from.
    pub fn stage(&self) -> AuthStage {
        match self {
            AuthError::MissingCredential => AuthStage::Unauthenticated,
            AuthError::MalformedCredential => AuthStage::HeaderExtracted,
            _ => AuthStage::TokenVerified,
        }
    }

    pub fn body(&self) -> AuthErrorBody {
        AuthErrorBody {
            message: self.message().to_string(),
            code: self.code().to_string(),
            code_prefix: CODE_PREFIX,
        }
    }
}

/// Wire shape of a rejection: `{message, code, codePrefix}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthErrorBody {
    pub message: String,
    pub code: String,
    pub code_prefix: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_code() {
        let kinds = [
            AuthError::MissingCredential,
            AuthError::MalformedCredential,
            AuthError::CredentialExpired,
            AuthError::CredentialRevoked,
            AuthError::CredentialInvalid,
            AuthError::TenantNotFound,
            AuthError::PrincipalNotFound,
            AuthError::AuthenticationFailed { code: UNKNOWN_ERROR_CODE.to_string() },
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|c| c.starts_with("auth/")));
    }

    #[test]
    fn body_serializes_with_code_prefix() {
        let body = AuthError::CredentialExpired.body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "auth/id-token-expired");
        assert_eq!(json["codePrefix"], "auth");
        assert!(json["message"].as_str().unwrap().contains("expired"));
    }

    #[test]
    fn stages_follow_the_request_flow() {
        assert_eq!(AuthError::MissingCredential.stage(), AuthStage::Unauthenticated);
        assert_eq!(AuthError::MalformedCredential.stage(), AuthStage::HeaderExtracted);
        assert_eq!(AuthError::CredentialRevoked.stage(), AuthStage::TokenVerified);
    }
}
