use axum::{
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use tenantry_auth::{AuthError, Authenticator};

use crate::app::errors::auth_error_to_response;

#[derive(Clone, Debug)]
pub struct AuthState {
    pub authenticator: Authenticator,
}

/// Authenticate the request before any protected handler runs.
///
/// On success exactly one `Principal` is attached to the request extensions;
/// on failure the 401 response is returned and the handler never runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(s) => Some(s.to_owned()),
            Err(_) => {
                tracing::warn!(
                    code = AuthError::MalformedCredential.code(),
                    "non-ASCII authorization header"
                );
                return auth_error_to_response(&AuthError::MalformedCredential);
            }
        },
    };

    match state.authenticator.authenticate(header.as_deref()).await {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => auth_error_to_response(&e),
    }
}
