//! Login endpoints and the caller's profile.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use tenantry_auth::{Credential, Principal, normalize};

use crate::app::dto::{AuthResponse, LoginRequest, LoginWithTokenRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use super::common;
use crate::context::CurrentUser;

/// `POST /auth/login`: exchange e-mail/password for a verified session.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let req = match common::body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let token = match services.sign_in.sign_in_with_password(&req.email, &req.password).await {
        Ok(t) => t,
        Err(provider_err) => {
            let err = normalize(&provider_err);
            tracing::warn!(code = err.code(), "password sign-in rejected");
            return errors::auth_error_to_response(&err);
        }
    };
    session(&services, token).await
}

/// `POST /auth/login-with-token`: verify an ID token obtained by the client.
pub async fn login_with_token(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginWithTokenRequest>, JsonRejection>,
) -> Response {
    let req = match common::body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    session(&services, req.id_token).await
}

async fn session(services: &AppServices, token: String) -> Response {
    let credential = Credential::new(token);
    let principal = match services.authenticator.verify(&credential).await {
        Ok(identity) => Principal::from(identity),
        Err(e) => {
            tracing::warn!(code = e.code(), "login rejected");
            return errors::auth_error_to_response(&e);
        }
    };
    let profile = services.user_profile(principal.uid()).await;
    tracing::info!(uid = %principal.uid(), has_profile = profile.is_some(), "login succeeded");

    let body = AuthResponse::new(principal, credential.as_str().to_string(), profile);
    (StatusCode::OK, Json(body)).into_response()
}

/// `GET /auth/profile`: the authenticated principal.
pub async fn profile(user: CurrentUser) -> impl IntoResponse {
    Json(user.into_inner())
}
