use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    response::Response,
    routing::{get, post},
};

use tenantry_companies::{CreateCompanyModule, UpdateCompanyModule};

use crate::app::dto::CompanyFilter;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_company_module).get(list_company_modules))
        .route("/:id", get(get_company_module).patch(update_company_module))
}

pub async fn create_company_module(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    body: Result<Json<CreateCompanyModule>, JsonRejection>,
) -> Response {
    common::create(&services.company_modules, &user, body).await
}

/// `GET /company-modules?idCompany=<id>` narrows to one company.
pub async fn list_company_modules(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<CompanyFilter>,
) -> Response {
    let filters = common::filters([("idCompany", filter.id_company)]);
    common::list(&services.company_modules, filters).await
}

pub async fn get_company_module(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.company_modules, id).await
}

pub async fn update_company_module(
    Extension(services): Extension<Arc<AppServices>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateCompanyModule>, JsonRejection>,
) -> Response {
    common::update(&services.company_modules, &user, id, body).await
}
