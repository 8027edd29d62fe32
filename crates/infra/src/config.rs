//! Backend configuration, read once at startup from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Auth emulators accept any API key.
const EMULATOR_API_KEY: &str = "emulator-api-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("invalid service account {path}: {reason}")]
    ServiceAccount { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub firestore_emulator_host: Option<String>,
    pub auth_emulator_host: Option<String>,
    /// OAuth2 access token for Firestore calls.
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process store and identity fixtures.
    Memory { identity_fixtures: Option<PathBuf> },
    Firebase(FirebaseConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Upper bound for one request, including the provider round trip.
    pub request_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: String,
    client_email: String,
}

impl ServiceAccount {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::ServiceAccount {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let account: ServiceAccount =
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;

        if account.kind.as_deref().is_some_and(|k| k != "service_account") {
            return Err(invalid("type must be service_account".to_string()));
        }
        if account.project_id.trim().is_empty() {
            return Err(invalid("project_id is empty".to_string()));
        }
        let email_ok = account
            .client_email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.ends_with(".iam.gserviceaccount.com")
            });
        if !email_ok {
            return Err(invalid(format!(
                "client_email {} is not a service account address",
                account.client_email
            )));
        }
        Ok(account)
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match get("TENANTRY_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TENANTRY_REQUEST_TIMEOUT_SECS",
                        reason: format!("expected a positive number of seconds, got {raw:?}"),
                    });
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let kind = match get("TENANTRY_BACKEND").as_deref().map(str::trim) {
            None | Some("memory") => BackendKind::Memory {
                identity_fixtures: get("TENANTRY_IDENTITY_FIXTURES").map(PathBuf::from),
            },
            Some("firebase") => BackendKind::Firebase(Self::firebase(&get)?),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "TENANTRY_BACKEND",
                    reason: format!("expected memory or firebase, got {other:?}"),
                });
            }
        };

        Ok(Self {
            kind,
            request_timeout,
        })
    }

    fn firebase<G>(get: &G) -> Result<FirebaseConfig, ConfigError>
    where
        G: Fn(&str) -> Option<String>,
    {
        let service_account = get("FIREBASE_SERVICE_ACCOUNT_PATH")
            .map(|p| ServiceAccount::load(Path::new(&p)))
            .transpose()?;

        let project_id = get("FIREBASE_PROJECT_ID")
            .or_else(|| service_account.map(|a| a.project_id))
            .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let auth_emulator_host = get("FIREBASE_AUTH_EMULATOR_HOST");
        let api_key = match (get("FIREBASE_API_KEY"), &auth_emulator_host) {
            (Some(key), _) => key,
            (None, Some(_)) => EMULATOR_API_KEY.to_string(),
            (None, None) => return Err(ConfigError::Missing("FIREBASE_API_KEY")),
        };

        Ok(FirebaseConfig {
            project_id,
            api_key,
            database_id: get("FIREBASE_DATABASE_ID")
                .unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string()),
            firestore_emulator_host: get("FIRESTORE_EMULATOR_HOST"),
            auth_emulator_host,
            access_token: get("GOOGLE_ACCESS_TOKEN"),
        })
    }
}
