//! Identity Toolkit (Firebase Authentication) REST client.
//!
//! Tokens are verified by the service itself through `accounts:lookup`; the
//! token payload is only decoded locally to surface its raw claims and to
//! check revocation against the account's `validSince`.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use tenantry_auth::{ClaimSet, IdentityProvider, PasswordSignIn, ProviderError, VerifiedIdentity};

const IDENTITY_TOOLKIT_HOST: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone)]
pub struct IdentityToolkitSettings {
    /// Web API key of the project.
    pub api_key: String,
    /// `host:port` of a local auth emulator.
    pub emulator_host: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct IdentityToolkitProvider {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    email: Option<String>,
    email_verified: Option<bool>,
    display_name: Option<String>,
    photo_url: Option<String>,
    #[serde(default)]
    disabled: bool,
    /// Seconds since the epoch, as a decimal string.
    valid_since: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
}

fn internal(message: impl Into<String>) -> ProviderError {
    ProviderError::new("auth/internal-error", message)
}

/// Translate a REST error message (`TOKEN_EXPIRED`, `INVALID_PASSWORD : ...`)
/// into a provider code.
///
/// Only a reason token that is the whole message or is followed by ` :` counts;
/// free-form prose falls back to `auth/internal-error`.
fn provider_code(message: &str) -> String {
    let reason = match message.split_once(" :") {
        Some((reason, _)) => reason,
        None => message,
    }
    .trim();
    let code = match reason {
        "INVALID_ID_TOKEN" => "auth/invalid-id-token",
        "TOKEN_EXPIRED" => "auth/id-token-expired",
        "USER_NOT_FOUND" => "auth/user-not-found",
        "USER_DISABLED" => "auth/user-disabled",
        "CONFIGURATION_NOT_FOUND" | "PROJECT_NOT_FOUND" => "auth/project-not-found",
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "auth/invalid-credential"
        }
        other if !other.is_empty() && other.chars().all(|c| c.is_ascii_uppercase() || c == '_') => {
            return format!("auth/{}", other.to_ascii_lowercase().replace('_', "-"));
        }
        _ => "auth/internal-error",
    };
    code.to_string()
}

/// Decode the payload segment of a JWT without checking its signature.
fn decode_claims(token: &str) -> Result<ClaimSet, ProviderError> {
    let invalid = |why: &str| ProviderError::new("auth/invalid-id-token", why.to_string());
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(invalid("ID token must have three segments")),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| invalid("ID token payload is not base64url"))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        _ => Err(invalid("ID token payload is not a JSON object")),
    }
}

/// Whether a token issued at `issued_at` predates the account's `validSince`.
fn is_revoked(claims: &ClaimSet, valid_since: Option<&str>) -> bool {
    let Some(valid_since) = valid_since.and_then(|v| v.parse::<i64>().ok()) else {
        return false;
    };
    let issued_at = claims
        .get("auth_time")
        .or_else(|| claims.get("iat"))
        .and_then(Value::as_i64);
    issued_at.is_some_and(|t| t < valid_since)
}

impl IdentityToolkitProvider {
    pub fn new(settings: IdentityToolkitSettings) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| internal(e.to_string()))?;
        let base_url = match &settings.emulator_host {
            Some(h) => format!("http://{h}/identitytoolkit.googleapis.com/v1"),
            None => format!("{IDENTITY_TOOLKIT_HOST}/v1"),
        };
        Ok(Self {
            http,
            base_url,
            api_key: settings.api_key,
        })
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: Value,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/accounts:{method}", self.base_url);
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| internal(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| internal(format!("unreadable {method} response: {e}")))?;

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            debug!(method, status = status.as_u16(), %message, "identity toolkit rejected call");
            return Err(ProviderError::new(provider_code(&message), message));
        }
        serde_json::from_value(payload).map_err(|e| internal(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError> {
        let lookup: LookupResponse = self.call("lookup", json!({ "idToken": token })).await?;
        let account = lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new("auth/user-not-found", "no account for token"))?;

        if account.disabled {
            return Err(ProviderError::new(
                "auth/user-disabled",
                "the account has been disabled",
            ));
        }

        let claims = decode_claims(token)?;
        if is_revoked(&claims, account.valid_since.as_deref()) {
            return Err(ProviderError::new(
                "auth/id-token-revoked",
                "the ID token was issued before the account's tokens were revoked",
            ));
        }

        let mut identity = VerifiedIdentity::new(account.local_id).with_claims(claims);
        if let Some(email) = account.email {
            identity = identity.with_email(email, account.email_verified.unwrap_or(false));
        }
        if let Some(name) = account.display_name {
            identity = identity.with_name(name);
        }
        if let Some(picture) = account.photo_url {
            identity = identity.with_picture(picture);
        }
        Ok(identity)
    }
}

#[async_trait]
impl PasswordSignIn for IdentityToolkitProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, ProviderError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: SignInResponse = self.call("signInWithPassword", body).await?;
        Ok(response.id_token)
    }
}
