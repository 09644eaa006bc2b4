use crate::auth::Principal;
use crate::error::{HttpAppError, ValidatedJson};
use crate::services::{GalleryService, LifecycleService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use galleria_core::models::{BulkTrashRequest, CountResponse};
use std::sync::Arc;

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id, operation = "trash"))]
pub async fn trash_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    LifecycleService::trash(state.files.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, principal, request), fields(user_id = %principal.user_id, operation = "trash_many"))]
pub async fn trash_files(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    ValidatedJson(request): ValidatedJson<BulkTrashRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let count = LifecycleService::trash_many(state.files.as_ref(), &request.ids).await?;
    Ok(Json(CountResponse { count }))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id, operation = "restore"))]
pub async fn restore_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = LifecycleService::restore(state.files.as_ref(), id).await?;
    let file = GalleryService::with_albums(state.albums.as_ref(), record).await?;
    Ok(Json(file))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id, operation = "purge"))]
pub async fn purge_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    LifecycleService::purge(state.files.as_ref(), state.remote.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Compensating delete for a file created by an upload flow the client abandoned.
#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id, operation = "hard_delete"))]
pub async fn hard_delete_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    LifecycleService::hard_delete(state.files.as_ref(), state.remote.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id, operation = "empty_trash"))]
pub async fn empty_trash(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, HttpAppError> {
    let count = LifecycleService::empty_trash(state.files.as_ref(), state.remote.as_ref()).await?;
    Ok(Json(CountResponse { count }))
}
