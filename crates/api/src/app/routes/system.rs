use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Ready once the document store answers.
pub async fn ready(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.documents.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "not_ready", e.to_string())
        }
    }
}

pub async fn whoami(user: CurrentUser) -> impl IntoResponse {
    Json(user.into_inner())
}
