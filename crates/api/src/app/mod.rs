//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repositories and clients shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use tenantry_infra::Backend;
use tenantry_infra::config::DEFAULT_REQUEST_TIMEOUT;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Requests still running after this are answered with 408 and dropped.
    pub request_timeout: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(backend: Arc<Backend>, options: AppOptions) -> Router {
    let services = Arc::new(services::AppServices::new(&backend));
    let auth_state = middleware::AuthState {
        authenticator: services.authenticator.clone(),
    };

    // Protected routes: the auth middleware runs before every handler.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let public = routes::public_router().layer(Extension(services));

    Router::new().merge(public).merge(protected).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(options.request_timeout)),
    )
}
