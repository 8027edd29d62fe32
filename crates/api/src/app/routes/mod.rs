use axum::{
    Router,
    routing::{get, post},
};

pub mod app_modules;
pub mod auth;
pub mod common;
pub mod companies;
pub mod company_modules;
pub mod company_subscriptions;
pub mod regions;
pub mod subscription_plan_modules;
pub mod subscription_plans;
pub mod system;

/// Endpoints reachable without a bearer credential.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/health/ready", get(system::ready))
        .route("/auth/login", post(auth::login))
        .route("/auth/login-with-token", post(auth::login_with_token))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/auth/profile", get(auth::profile))
        .nest("/companies", companies::router())
        .nest("/subscription-plans", subscription_plans::router())
        .nest("/app-modules", app_modules::router())
        .nest("/company-modules", company_modules::router())
        .nest("/company-subscriptions", company_subscriptions::router())
        .nest("/subscription-plan-modules", subscription_plan_modules::router())
        .nest("/regions", regions::router())
}
