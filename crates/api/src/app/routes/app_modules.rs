use std::sync::Arc;

use axum::{Router, extract::Extension, response::Response, routing::get};

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_app_modules))
}

pub async fn list_app_modules(Extension(services): Extension<Arc<AppServices>>) -> Response {
    common::list(&services.app_modules, vec![]).await
}
