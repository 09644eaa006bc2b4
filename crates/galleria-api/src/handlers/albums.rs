use crate::auth::Principal;
use crate::error::{HttpAppError, ValidatedJson};
use crate::services::AlbumService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use galleria_core::models::{CreateAlbumRequest, LinkFileRequest, UpdateAlbumRequest};
use std::sync::Arc;

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn list_albums(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, HttpAppError> {
    let albums = state.albums.list().await?;
    Ok(Json(albums))
}

#[tracing::instrument(skip(state, principal, request), fields(user_id = %principal.user_id))]
pub async fn create_album(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    ValidatedJson(request): ValidatedJson<CreateAlbumRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let album = AlbumService::create(state.albums.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let album = AlbumService::get(state.albums.as_ref(), id).await?;
    Ok(Json(album))
}

#[tracing::instrument(skip(state, principal, request), fields(user_id = %principal.user_id))]
pub async fn update_album(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateAlbumRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let album = AlbumService::update(state.albums.as_ref(), id, request).await?;
    Ok(Json(album))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn delete_album(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    AlbumService::delete(state.albums.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, principal, request), fields(user_id = %principal.user_id))]
pub async fn link_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(album_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<LinkFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = AlbumService::link(
        state.files.as_ref(),
        state.albums.as_ref(),
        album_id,
        request.file_id,
    )
    .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn unlink_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path((album_id, file_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, HttpAppError> {
    AlbumService::unlink(state.albums.as_ref(), album_id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
