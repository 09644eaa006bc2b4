use crate::auth::Principal;
use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::services::GalleryService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use galleria_core::models::{FileFilter, FileListQuery, UpdateFileRequest};
use galleria_db::FileScope;
use std::sync::Arc;

/// Active files, filtered, sorted and paged.
#[tracing::instrument(skip(state, principal, query), fields(user_id = %principal.user_id))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    ValidatedQuery(query): ValidatedQuery<FileListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = FileFilter::from(query);
    let page = GalleryService::list(
        state.files.as_ref(),
        state.albums.as_ref(),
        &filter,
        FileScope::Active,
    )
    .await?;
    Ok(Json(page))
}

/// Trashed files, newest deletion first.
#[tracing::instrument(skip(state, principal, query), fields(user_id = %principal.user_id))]
pub async fn list_trash(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    ValidatedQuery(query): ValidatedQuery<FileListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = FileFilter::from(query);
    let page = GalleryService::list(
        state.files.as_ref(),
        state.albums.as_ref(),
        &filter,
        FileScope::Trashed,
    )
    .await?;
    Ok(Json(page))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = GalleryService::get(state.files.as_ref(), state.albums.as_ref(), id).await?;
    Ok(Json(file))
}

/// Update caption and/or album links. Answers with the complete record.
#[tracing::instrument(skip(state, principal, request), fields(user_id = %principal.user_id))]
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file =
        GalleryService::update(state.files.as_ref(), state.albums.as_ref(), id, request).await?;
    Ok(Json(file))
}
