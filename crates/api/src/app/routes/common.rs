//! Generic CRUD handlers shared by the entity routes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use tenantry_core::{DocumentId, Draft, Entity, Patch, Record};
use tenantry_infra::Repository;
use tenantry_infra::document_store::FieldFilter;

use crate::app::errors;
use crate::context::CurrentUser;

fn parse_id(id: &str) -> Result<DocumentId, Response> {
    id.parse::<DocumentId>().map_err(errors::invalid_id)
}

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(v)| v)
        .map_err(|r| errors::json_error(StatusCode::BAD_REQUEST, "validation_error", r.body_text()))
}

pub async fn create<D>(
    repo: &Repository<D::Record>,
    user: &CurrentUser,
    payload: Result<Json<D>, JsonRejection>,
) -> Response
where
    D: Draft,
{
    let draft = match body(payload) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let label = <D::Record as Record>::LABEL;
    match repo.create(draft).await {
        Ok(record) => {
            tracing::info!(actor = %user.uid(), id = %record.id(), "{label} created");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e, label, None),
    }
}

pub async fn list<R: Record>(repo: &Repository<R>, filters: Vec<FieldFilter>) -> Response {
    match repo.query(&filters).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::repository_error_to_response(e, R::LABEL, None),
    }
}

pub async fn get_one<R: Record>(repo: &Repository<R>, id: String) -> Response {
    let doc_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match repo.find_one(&doc_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::repository_error_to_response(e, R::LABEL, Some(&id)),
    }
}

pub async fn update<P>(
    repo: &Repository<P::Record>,
    user: &CurrentUser,
    id: String,
    payload: Result<Json<P>, JsonRejection>,
) -> Response
where
    P: Patch,
{
    let label = <P::Record as Record>::LABEL;
    let doc_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let patch = match body(payload) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match repo.update(&doc_id, patch).await {
        Ok(record) => {
            tracing::info!(actor = %user.uid(), %id, "{label} updated");
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e, label, Some(&id)),
    }
}

pub async fn delete<R: Record>(repo: &Repository<R>, user: &CurrentUser, id: String) -> Response {
    let doc_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match repo.remove(&doc_id).await {
        Ok(()) => {
            tracing::info!(actor = %user.uid(), %id, "{} removed", R::LABEL);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::repository_error_to_response(e, R::LABEL, Some(&id)),
    }
}

/// Equality filters from optional query parameters.
pub fn filters<const N: usize>(params: [(&str, Option<String>); N]) -> Vec<FieldFilter> {
    params
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| FieldFilter::eq(field, v)))
        .collect()
}
