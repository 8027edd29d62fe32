use std::ops::Deref;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};

use tenantry_auth::{AuthError, Principal};

use crate::app::errors::auth_error_to_response;

/// The authenticated principal of the current request.
///
/// This is the only way handlers read the principal. It is present for every
/// route behind [`crate::middleware::auth_middleware`]; elsewhere extraction
/// fails with `MissingCredential`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(Principal);

impl CurrentUser {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = Principal;

    fn deref(&self) -> &Principal {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| auth_error_to_response(&AuthError::MissingCredential))
    }
}
