use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    response::Response,
    routing::{get, post},
};

use tenantry_plans::{CreateSubscriptionPlanModule, UpdateSubscriptionPlanModule};

use crate::app::dto::PlanFilter;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_plan_module).get(list_plan_modules))
        .route("/:id", get(get_plan_module).patch(update_plan_module))
}

pub async fn create_plan_module(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    body: Result<Json<CreateSubscriptionPlanModule>, JsonRejection>,
) -> Response {
    common::create(&services.subscription_plan_modules, &user, body).await
}

/// `GET /subscription-plan-modules?idSubscriptionPlan=<id>` narrows to one plan.
pub async fn list_plan_modules(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<PlanFilter>,
) -> Response {
    let filters = common::filters([("idSubscriptionPlan", filter.id_subscription_plan)]);
    common::list(&services.subscription_plan_modules, filters).await
}

pub async fn get_plan_module(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.subscription_plan_modules, id).await
}

pub async fn update_plan_module(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateSubscriptionPlanModule>, JsonRejection>,
) -> Response {
    common::update(&services.subscription_plan_modules, &user, id, body).await
}
