//! Retrieval proxy for remote file handles.

use crate::auth::Principal;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use galleria_core::AppError;
use std::sync::Arc;

const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Stream a stored file (or its thumbnail) from the remote store.
///
/// A `Range` header is forwarded upstream so video elements can seek; the
/// response is `206` whenever the remote store answered with a partial body.
#[tracing::instrument(skip(state, principal, headers), fields(user_id = %principal.user_id))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(file_handle): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let record = state
        .files
        .find_by_handle(&file_handle)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let remote = state.remote_store()?;
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());
    let remote_file = remote.fetch(&file_handle, range).await?;

    // The bot file server labels most files application/octet-stream, so the
    // type recorded at upload wins for the main file.
    let content_type = if record.file_handle == file_handle {
        record.content_type
    } else {
        remote_file
            .content_type
            .unwrap_or_else(|| THUMBNAIL_CONTENT_TYPE.to_string())
    };

    let status = if remote_file.partial {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, "private, max-age=3600");
    if let Some(length) = remote_file.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }
    if let Some(content_range) = remote_file.content_range {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    let stream = remote_file.stream.map(|chunk| {
        chunk.map_err(|e| std::io::Error::other(format!("Remote stream error: {}", e)))
    });

    let response = builder
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response.into_response())
}
