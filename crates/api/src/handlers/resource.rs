//! Generic handlers shared by every catalog collection.
//!
//! Routes pick the collection with a turbofish, e.g.
//! `get(resource::get_by_id::<Character>)`; [`Collection::store`] resolves
//! the backing store from state.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::conditional::{evaluate_read, ReadDisposition};
use catalog_core::error::CoreError;
use catalog_core::listing::resolve;
use catalog_core::mutation::{apply_update, ConditionalStore, Resource};
use catalog_core::types::DbId;
use catalog_core::validation::Validator;
use catalog_core::version::Versioned;
use catalog_db::store::{CatalogResource, ResourceStore};
use serde_json::{Map, Value};

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, ListResponse, VersionMetadata};
use crate::state::{AppState, Collection};

fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: R::KIND.entity_name(),
        id,
    })
}

/// Unwrap the `{id}` path segment.
fn path_id(path: Result<Path<DbId>, PathRejection>) -> AppResult<DbId> {
    path.map(|Path(id)| id)
        .map_err(|rejection| CoreError::invalid("id", rejection.body_text()).into())
}

/// Unwrap a JSON body that must be an object.
fn json_object(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Map<String, Value>> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest("Request body must be a JSON object".into())),
    }
}

/// Full representation with validator headers.
fn representation<R: CatalogResource>(
    status: StatusCode,
    message: String,
    resource: R,
    cache_control: Option<&str>,
) -> AppResult<Response> {
    let version = resource.version()?;
    let last_modified = resource.last_modified()?;
    let headers = caching::version_headers(&version, &last_modified, cache_control)?;
    let metadata = VersionMetadata::new(&version, &last_modified);
    Ok((
        status,
        headers,
        Json(DataResponse::new(message, resource, metadata)),
    )
        .into_response())
}

/// GET /api/v1/{collection}
pub async fn list<R: Collection>(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) =
        query.map_err(|rejection| CoreError::invalid("query", rejection.body_text()))?;
    let spec = resolve(&params, R::KIND)?;
    let page = R::store(&state).list(&spec).await?;

    let headers = caching::cache_control(&state.config.cache.list())?;
    Ok((headers, Json(ListResponse::from(page))).into_response())
}

/// GET /api/v1/{collection}/{id}
///
/// Answers 304 when `If-None-Match` names the current version.
pub async fn get_by_id<R: Collection>(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let id = path_id(path)?;
    let resource = R::store(&state)
        .load(id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    let version = resource.version()?;

    match evaluate_read(caching::if_none_match(&headers), &version) {
        ReadDisposition::NotModified => {
            caching::not_modified(&version, &state.config.cache.not_modified)
        }
        ReadDisposition::Fresh => representation(
            StatusCode::OK,
            format!("{} retrieved", R::KIND.entity_name()),
            resource,
            Some(state.config.cache.item().as_str()),
        ),
    }
}

/// POST /api/v1/{collection}
pub async fn create<R: Collection>(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Response> {
    let body = json_object(payload)?;
    Validator::new(R::RULES).validate_map(&body)?;
    let input: R::Create = serde_json::from_value(Value::Object(body))
        .map_err(|e| CoreError::invalid("body", e.to_string()))?;

    let created = R::store(&state).insert(&input).await?;
    tracing::info!(
        entity = R::KIND.entity_name(),
        id = created.id(),
        subject = user.subject,
        role = %user.role,
        "Resource created"
    );

    representation(
        StatusCode::CREATED,
        format!("{} created", R::KIND.entity_name()),
        created,
        None,
    )
}

/// PUT /api/v1/{collection}/{id}
///
/// Fields missing from the body keep their current values. With `If-Match`
/// the write only happens if the resource is still at that version.
pub async fn update<R: Collection>(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    user: AuthUser,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Response> {
    let id = path_id(path)?;
    let if_match = caching::if_match(&headers);
    if if_match.is_none() && state.config.require_if_match {
        return Err(AppError::PreconditionRequired(
            "This request must be conditional; send If-Match with the current ETag".into(),
        ));
    }
    let changes = json_object(payload)?;

    let updated = apply_update::<R, _>(
        R::store(&state),
        &Validator::new(R::RULES),
        id,
        if_match,
        &changes,
    )
    .await
    .inspect_err(|err| {
        if matches!(err, CoreError::VersionConflict { .. }) {
            tracing::debug!(
                entity = R::KIND.entity_name(),
                id,
                if_match = if_match.unwrap_or_default(),
                "Update rejected: version conflict"
            );
        }
    })?;

    tracing::info!(
        entity = R::KIND.entity_name(),
        id,
        version = %updated.version,
        subject = user.subject,
        role = %user.role,
        "Resource updated"
    );

    representation(
        StatusCode::OK,
        format!("{} updated", R::KIND.entity_name()),
        updated.resource,
        None,
    )
}

/// DELETE /api/v1/{collection}/{id}
pub async fn delete<R: Collection>(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    let id = path_id(path)?;
    if R::store(&state).soft_delete(id).await? {
        tracing::info!(
            entity = R::KIND.entity_name(),
            id,
            subject = user.subject,
        role = %user.role,
            "Resource deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<R>(id))
    }
}
