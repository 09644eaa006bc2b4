use crate::auth::Principal;
use crate::error::HttpAppError;
use crate::services::{IngestRequest, IngestService};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use galleria_core::AppError;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// A multipart upload after the file part has been spooled to disk.
struct SpooledUpload {
    file: NamedTempFile,
    file_name: String,
    content_type: String,
    size: u64,
    caption: String,
    album_ids: Vec<i64>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the request body limit".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

fn too_large(max_size: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File size exceeds maximum allowed size of {} MB",
        max_size / 1024 / 1024
    ))
}

/// Album ids may arrive as repeated fields, comma-separated values, or both.
fn parse_album_ids(value: &str, into: &mut Vec<i64>) -> Result<(), AppError> {
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<i64>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid album id: {}", part)))?;
        into.push(id);
    }
    Ok(())
}

/// Read the form. Only one field named "file" is accepted.
async fn spool_multipart(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<SpooledUpload, AppError> {
    let mut spooled: Option<(NamedTempFile, String, String, u64)> = None;
    let mut caption = String::new();
    let mut album_ids = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if spooled.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let tmp = NamedTempFile::new()?;
                let mut writer = tokio::fs::File::from_std(tmp.reopen()?);
                let mut size: u64 = 0;
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    size += chunk.len() as u64;
                    if size > max_size as u64 {
                        return Err(too_large(max_size));
                    }
                    writer.write_all(&chunk).await?;
                }
                writer.flush().await?;

                spooled = Some((tmp, file_name, content_type, size));
            }
            "caption" => {
                caption = field.text().await.map_err(multipart_error)?;
            }
            "album_ids" | "album_ids[]" => {
                let value = field.text().await.map_err(multipart_error)?;
                parse_album_ids(&value, &mut album_ids)?;
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let (file, file_name, content_type, size) =
        spooled.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    if size == 0 {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    Ok(SpooledUpload {
        file,
        file_name,
        content_type,
        size,
        caption: caption.trim().to_string(),
        album_ids,
    })
}

/// Spool the file to disk, relay it to the remote store and record it.
/// The temporary file is removed when the handler returns, on every path.
#[tracing::instrument(skip(state, principal, multipart), fields(user_id = %principal.user_id))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let remote = state.remote_store()?;
    let upload = spool_multipart(multipart, state.config.max_upload_size_bytes()).await?;

    let response = IngestService::ingest(
        state.files.as_ref(),
        state.albums.as_ref(),
        remote.as_ref(),
        IngestRequest {
            path: upload.file.path(),
            file_name: &upload.file_name,
            content_type: &upload.content_type,
            size: upload.size,
            caption: &upload.caption,
            album_ids: &upload.album_ids,
        },
    )
    .await?;

    tracing::info!(
        file_id = response.file.id,
        kind = %response.file.kind,
        size = upload.size,
        "File uploaded"
    );

    Ok((StatusCode::CREATED, Json(response)))
}
