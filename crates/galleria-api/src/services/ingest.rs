//! Media ingest: remote upload, metadata insert, optional album links.
//!
//! A metadata insert that fails after the remote upload succeeded always triggers
//! a best-effort delete of the remote message, so no remote bytes are left without
//! a record pointing at them. Album link failures never undo the upload; they
//! are reported next to the created file.

use galleria_core::models::{AlbumSummary, MediaKind, NewFileRecord, UploadResponse};
use galleria_core::{AppError, ErrorMetadata};
use galleria_db::{AlbumRepositoryTrait, FileRepositoryTrait};
use galleria_storage::{RemoteStore, UploadRequest};
use std::collections::BTreeSet;
use std::path::Path;

/// A fully spooled upload and its form fields.
#[derive(Debug, Clone, Copy)]
pub struct IngestRequest<'a> {
    pub path: &'a Path,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size: u64,
    pub caption: &'a str,
    pub album_ids: &'a [i64],
}

pub struct IngestService;

impl IngestService {
    #[tracing::instrument(
        skip(files, albums, remote, request),
        fields(file_name = %request.file_name, content_type = %request.content_type, size = request.size)
    )]
    pub async fn ingest(
        files: &dyn FileRepositoryTrait,
        albums: &dyn AlbumRepositoryTrait,
        remote: &dyn RemoteStore,
        request: IngestRequest<'_>,
    ) -> Result<UploadResponse, AppError> {
        let kind = MediaKind::from_content_type(request.content_type);

        let stored = remote
            .upload(UploadRequest {
                kind,
                path: request.path,
                file_name: request.file_name,
                content_type: request.content_type,
                size: request.size,
                caption: request.caption,
            })
            .await?;

        tracing::debug!(
            kind = %kind,
            message_id = stored.message_id,
            "Remote upload completed"
        );

        let message_id = stored.message_id;
        let created = files
            .create(NewFileRecord {
                file_handle: stored.file_handle,
                thumbnail_handle: stored.thumbnail_handle,
                caption: request.caption.to_string(),
                kind,
                content_type: request.content_type.to_string(),
                file_name: request.file_name.to_string(),
                size_bytes: stored.size_bytes,
                remote_message_id: message_id,
            })
            .await;

        let record = match created {
            Ok(record) => record,
            Err(err) => {
                if let Err(e) = remote.delete_message(message_id).await {
                    tracing::warn!(
                        error = %e,
                        message_id,
                        "Failed to remove remote copy after metadata insert failed"
                    );
                }
                return Err(err);
            }
        };

        let album_link_error = Self::link_albums(albums, record.id, request.album_ids).await;
        let linked = Self::albums_of(albums, record.id).await;

        tracing::info!(file_id = record.id, kind = %kind, "File uploaded");

        Ok(UploadResponse {
            file: record.into_response(linked),
            album_link_error,
        })
    }

    /// Link the new file to each requested album. Returns a description of whatever
    /// could not be linked.
    async fn link_albums(
        albums: &dyn AlbumRepositoryTrait,
        file_id: i64,
        album_ids: &[i64],
    ) -> Option<String> {
        let requested: Vec<i64> = album_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if requested.is_empty() {
            return None;
        }

        let existing = match albums.existing_ids(&requested).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(error = %e, file_id, "Failed to look up requested albums");
                return Some(format!("Failed to link albums: {}", e.client_message()));
            }
        };

        let mut problems = Vec::new();
        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !existing.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            problems.push(format!("Albums not found: {}", missing.join(", ")));
        }

        if let Err(e) = albums.link_many(file_id, &existing).await {
            tracing::warn!(error = %e, file_id, "Failed to link uploaded file to albums");
            problems.push(format!("Failed to link albums: {}", e.client_message()));
        }

        if problems.is_empty() {
            None
        } else {
            Some(problems.join("; "))
        }
    }

    async fn albums_of(albums: &dyn AlbumRepositoryTrait, file_id: i64) -> Vec<AlbumSummary> {
        match albums.albums_for_files(&[file_id]).await {
            Ok(mut by_file) => by_file.remove(&file_id).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, file_id, "Failed to load albums of uploaded file");
                Vec::new()
            }
        }
    }
}
