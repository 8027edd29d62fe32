use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use tenantry_auth::{IdentityProvider, PasswordSignIn, ProviderError, VerifiedIdentity};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read identity fixtures {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid identity fixtures: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome registered for a token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TokenFixture {
    Identity(VerifiedIdentity),
    Error { code: String, message: String },
}

#[derive(Debug, Deserialize)]
struct AccountFixture {
    email: String,
    password: String,
    token: String,
}

/// On-disk fixture format.
///
/// ```json
/// {
///   "tokens": {
///     "good-token": { "identity": { "uid": "u1", "email": "a@b.com" } },
///     "expired-token": { "error": { "code": "auth/id-token-expired", "message": "expired" } }
///   },
///   "accounts": [{ "email": "a@b.com", "password": "secret", "token": "good-token" }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    tokens: HashMap<String, TokenFixture>,
    #[serde(default)]
    accounts: Vec<AccountFixture>,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    token: String,
}

/// In-memory identity provider.
///
/// Intended for tests/dev. Unknown tokens are reported as
/// `auth/invalid-id-token`.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    tokens: RwLock<HashMap<String, Result<VerifiedIdentity, ProviderError>>>,
    accounts: RwLock<HashMap<String, Account>>,
}

fn poisoned() -> ProviderError {
    ProviderError::new("auth/internal-error", "identity fixtures lock poisoned")
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture_json(json: &str) -> Result<Self, FixtureError> {
        let fixtures: Fixtures = serde_json::from_str(json)?;
        let tokens = fixtures
            .tokens
            .into_iter()
            .map(|(token, fixture)| {
                let outcome = match fixture {
                    TokenFixture::Identity(identity) => Ok(identity),
                    TokenFixture::Error { code, message } => Err(ProviderError::new(code, message)),
                };
                (token, outcome)
            })
            .collect();
        let accounts = fixtures
            .accounts
            .into_iter()
            .map(|a| {
                let account = Account {
                    password: a.password,
                    token: a.token,
                };
                (a.email, account)
            })
            .collect();
        Ok(Self {
            tokens: RwLock::new(tokens),
            accounts: RwLock::new(accounts),
        })
    }

    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_fixture_json(&json)
    }

    pub fn with_identity(self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.insert(token.into(), Ok(identity));
        self
    }

    pub fn with_failure(
        self,
        token: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.insert(token.into(), Err(ProviderError::new(code, message)));
        self
    }

    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(
                email.into(),
                Account {
                    password: password.into(),
                    token: token.into(),
                },
            );
        }
        self
    }

    fn insert(&self, token: String, outcome: Result<VerifiedIdentity, ProviderError>) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token, outcome);
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError> {
        let tokens = self.tokens.read().map_err(|_| poisoned())?;
        match tokens.get(token) {
            Some(outcome) => outcome.clone(),
            None => Err(ProviderError::new(
                "auth/invalid-id-token",
                "token is not registered",
            )),
        }
    }
}

#[async_trait]
impl PasswordSignIn for InMemoryIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, ProviderError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.token.clone()),
            _ => Err(ProviderError::new(
                "auth/invalid-credential",
                "email or password is incorrect",
            )),
        }
    }
}
