use serde::{Deserialize, Serialize};
use serde_json::Value;

use tenantry_auth::Principal;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginWithTokenRequest {
    pub id_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    pub id_company: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFilter {
    pub id_subscription_plan: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// Session returned by the login endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub uid: String,
    pub email: Option<String>,
    pub access_token: String,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub email_verified: bool,
    /// The `users/<uid>` document, when one exists.
    pub profile: Option<Value>,
}

impl AuthResponse {
    pub fn new(principal: Principal, access_token: String, profile: Option<Value>) -> Self {
        Self {
            uid: principal.uid.to_string(),
            email: principal.email,
            access_token,
            display_name: principal.name,
            photo_url: principal.picture,
            email_verified: principal.email_verified.unwrap_or(false),
            profile,
        }
    }
}
