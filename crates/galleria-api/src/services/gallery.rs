//! Browsing, single reads and metadata updates of file records.
//!
//! Every response carries the file's album list, so clients never have to merge
//! a partial update into state they already hold.

use galleria_core::models::{FileFilter, FileRecord, FileResponse, Page, UpdateFileRequest};
use galleria_core::AppError;
use galleria_db::{AlbumRepositoryTrait, FileRepositoryTrait, FileScope};
use std::collections::BTreeSet;

pub struct GalleryService;

impl GalleryService {
    #[tracing::instrument(skip(files, albums, filter))]
    pub async fn list(
        files: &dyn FileRepositoryTrait,
        albums: &dyn AlbumRepositoryTrait,
        filter: &FileFilter,
        scope: FileScope,
    ) -> Result<Page<FileResponse>, AppError> {
        let page = files.list(filter, scope).await?;
        let ids: Vec<i64> = page.items.iter().map(|f| f.id).collect();
        let mut links = albums.albums_for_files(&ids).await?;

        Ok(page.map(|record| {
            let file_albums = links.remove(&record.id).unwrap_or_default();
            record.into_response(file_albums)
        }))
    }

    #[tracing::instrument(skip(files, albums))]
    pub async fn get(
        files: &dyn FileRepositoryTrait,
        albums: &dyn AlbumRepositoryTrait,
        id: i64,
    ) -> Result<FileResponse, AppError> {
        let record = files
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;

        Self::with_albums(albums, record).await
    }

    /// Apply a caption change and/or replace the album set, then return the
    /// authoritative record. Unknown album ids reject the whole update.
    #[tracing::instrument(skip(files, albums, request))]
    pub async fn update(
        files: &dyn FileRepositoryTrait,
        albums: &dyn AlbumRepositoryTrait,
        id: i64,
        request: UpdateFileRequest,
    ) -> Result<FileResponse, AppError> {
        let mut record = files
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;

        let album_ids = match request.album_ids {
            Some(ids) => {
                let ids: Vec<i64> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
                let existing = albums.existing_ids(&ids).await?;
                let missing: Vec<String> = ids
                    .iter()
                    .filter(|id| !existing.contains(id))
                    .map(|id| id.to_string())
                    .collect();
                if !missing.is_empty() {
                    return Err(AppError::InvalidInput(format!(
                        "Albums not found: {}",
                        missing.join(", ")
                    )));
                }
                Some(ids)
            }
            None => None,
        };

        if let Some(caption) = request.caption {
            record = files
                .update_caption(id, &caption)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;
        }

        if let Some(ids) = album_ids {
            albums.set_links(id, &ids).await?;
        }

        Self::with_albums(albums, record).await
    }

    pub async fn with_albums(
        albums: &dyn AlbumRepositoryTrait,
        record: FileRecord,
    ) -> Result<FileResponse, AppError> {
        let file_albums = albums
            .albums_for_files(&[record.id])
            .await?
            .remove(&record.id)
            .unwrap_or_default();
        Ok(record.into_response(file_albums))
    }
}
