use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tenantry_auth::AuthError;
use tenantry_core::DomainError;
use tenantry_infra::RepositoryError;

/// 401 with the taxonomy body `{message, code, codePrefix}`.
pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    (StatusCode::UNAUTHORIZED, axum::Json(err.body())).into_response()
}

/// Map a repository failure for a `label` record (`id` when addressed).
pub fn repository_error_to_response(
    err: RepositoryError,
    label: &str,
    id: Option<&str>,
) -> axum::response::Response {
    match err {
        RepositoryError::Domain(DomainError::NotFound) => {
            let message = match id {
                Some(id) => format!("{label} with ID {id} not found"),
                None => format!("{label} not found"),
            };
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        RepositoryError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        RepositoryError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        RepositoryError::Domain(DomainError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        RepositoryError::Domain(DomainError::Mapping(msg)) => {
            tracing::error!(%msg, "stored document could not be mapped");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "mapping_error", msg)
        }
        RepositoryError::Store(e) => {
            tracing::error!(error = %e, "document store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn invalid_id(err: DomainError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
