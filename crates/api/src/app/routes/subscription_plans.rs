use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    response::Response,
    routing::{get, post},
};

use tenantry_plans::{CreateSubscriptionPlan, UpdateSubscriptionPlan};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_plan).get(list_plans))
        .route("/:id", get(get_plan).patch(update_plan))
}

pub async fn create_plan(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    body: Result<Json<CreateSubscriptionPlan>, JsonRejection>,
) -> Response {
    common::create(&services.subscription_plans, &user, body).await
}

pub async fn list_plans(Extension(services): Extension<Arc<AppServices>>) -> Response {
    common::list(&services.subscription_plans, vec![]).await
}

pub async fn get_plan(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.subscription_plans, id).await
}

pub async fn update_plan(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateSubscriptionPlan>, JsonRejection>,
) -> Response {
    common::update(&services.subscription_plans, &user, id, body).await
}
