use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    response::Response,
    routing::get,
};

use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_regions))
        .route("/:id", get(get_region))
}

pub async fn list_regions(Extension(services): Extension<Arc<AppServices>>) -> Response {
    common::list(&services.regions, vec![]).await
}

pub async fn get_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    common::get_one(&services.regions, id).await
}
