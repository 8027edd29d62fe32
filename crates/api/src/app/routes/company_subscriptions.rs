use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    response::Response,
    routing::{get, post},
};

use tenantry_companies::{CreateCompanySubscription, UpdateCompanySubscription};

use crate::app::dto::CompanyFilter;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_subscription).get(list_subscriptions))
        .route("/:id", get(get_subscription).patch(update_subscription))
}

pub async fn create_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    body: Result<Json<CreateCompanySubscription>, JsonRejection>,
) -> Response {
    common::create(&services.company_subscriptions, &user, body).await
}

pub async fn list_subscriptions(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<CompanyFilter>,
) -> Response {
    let filters = common::filters([("idCompany", filter.id_company)]);
    common::list(&services.company_subscriptions, filters).await
}

pub async fn get_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.company_subscriptions, id).await
}

pub async fn update_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateCompanySubscription>, JsonRejection>,
) -> Response {
    common::update(&services.company_subscriptions, &user, id, body).await
}
