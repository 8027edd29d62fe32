use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    response::Response,
    routing::{get, post},
};

use tenantry_companies::{CreateCompany, UpdateCompany};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_company).get(list_companies))
        .route(
            "/:id",
            get(get_company).patch(update_company).delete(delete_company),
        )
}

pub async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    body: Result<Json<CreateCompany>, JsonRejection>,
) -> Response {
    common::create(&services.companies, &user, body).await
}

pub async fn list_companies(Extension(services): Extension<Arc<AppServices>>) -> Response {
    common::list(&services.companies, vec![]).await
}

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.companies, id).await
}

pub async fn update_company(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateCompany>, JsonRejection>,
) -> Response {
    common::update(&services.companies, &user, id, body).await
}

pub async fn delete_company(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Response {
    common::delete(&services.companies, &user, id).await
}
