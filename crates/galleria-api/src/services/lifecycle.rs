//! File lifecycle: active → trashed → purged.
//!
//! The metadata row is authoritative. Remote copies are removed only when a
//! record is purged, after the row is gone, and a failed remote delete never
//! brings the row back.

use futures::stream::{self, StreamExt};
use galleria_core::models::FileRecord;
use galleria_core::AppError;
use galleria_db::FileRepositoryTrait;
use galleria_storage::RemoteStore;
use std::sync::Arc;

/// Concurrent remote deletes while emptying the trash.
const PURGE_CONCURRENCY: usize = 8;

pub struct LifecycleService;

impl LifecycleService {
    /// Active → trashed.
    #[tracing::instrument(skip(files))]
    pub async fn trash(files: &dyn FileRepositoryTrait, id: i64) -> Result<(), AppError> {
        if files.trash(id).await? {
            tracing::info!(file_id = id, "File moved to trash");
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "File {} not found or already in trash",
                id
            )))
        }
    }

    /// Bulk active → trashed. An empty id list is a client error and changes nothing.
    #[tracing::instrument(skip(files, ids), fields(count = ids.len()))]
    pub async fn trash_many(files: &dyn FileRepositoryTrait, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::BadRequest(
                "ids must contain at least one file id".to_string(),
            ));
        }

        let count = files.trash_many(ids).await?;
        tracing::info!(requested = ids.len(), trashed = count, "Files moved to trash");
        Ok(count)
    }

    /// Trashed → active.
    #[tracing::instrument(skip(files))]
    pub async fn restore(files: &dyn FileRepositoryTrait, id: i64) -> Result<FileRecord, AppError> {
        files
            .restore(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found in trash", id)))
    }

    /// Trashed → purged.
    #[tracing::instrument(skip(files, remote))]
    pub async fn purge(
        files: &dyn FileRepositoryTrait,
        remote: Option<&Arc<dyn RemoteStore>>,
        id: i64,
    ) -> Result<FileRecord, AppError> {
        let record = files
            .purge(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found in trash", id)))?;

        Self::delete_remote_copy(remote, &record).await;
        Ok(record)
    }

    /// Purge regardless of state. Used by clients to undo an upload flow that failed
    /// after the file record was created.
    #[tracing::instrument(skip(files, remote))]
    pub async fn hard_delete(
        files: &dyn FileRepositoryTrait,
        remote: Option<&Arc<dyn RemoteStore>>,
        id: i64,
    ) -> Result<FileRecord, AppError> {
        let record = files
            .hard_delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;

        Self::delete_remote_copy(remote, &record).await;
        Ok(record)
    }

    /// Empty the trash: one bulk metadata delete, then best-effort remote deletes
    /// for the rows that were actually removed. A record restored after the
    /// listing stays active and keeps its remote copy.
    ///
    /// Returns the number of records removed. Remote failures only reach the logs.
    #[tracing::instrument(skip(files, remote))]
    pub async fn empty_trash(
        files: &dyn FileRepositoryTrait,
        remote: Option<&Arc<dyn RemoteStore>>,
    ) -> Result<u64, AppError> {
        let trashed = files.list_all_trashed().await?;
        if trashed.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = trashed.iter().map(|r| r.id).collect();
        let purged = files.purge_many(&ids).await?;
        let count = purged.len() as u64;

        match remote {
            Some(remote) => {
                let failures: Vec<i64> = stream::iter(purged.iter().map(|r| (r.id, r.remote_message_id)).collect::<Vec<_>>())
                    .map(|(record_id, remote_message_id)| {
                        let remote = remote.clone();
                        async move {
                            match remote.delete_message(remote_message_id).await {
                                Ok(()) => None,
                                Err(e) => {
                                    tracing::warn!(
                                        error = %e,
                                        file_id = record_id,
                                        message_id = remote_message_id,
                                        "Failed to delete remote copy while emptying trash"
                                    );
                                    Some(record_id)
                                }
                            }
                        }
                    })
                    .buffer_unordered(PURGE_CONCURRENCY)
                    .filter_map(|failed| async move { failed })
                    .collect()
                    .await;

                if !failures.is_empty() {
                    tracing::warn!(
                        failed = failures.len(),
                        file_ids = ?failures,
                        "Some remote copies were left behind"
                    );
                }
            }
            None => {
                tracing::warn!(
                    count,
                    "Remote storage is not configured; remote copies were left behind"
                );
            }
        }

        tracing::info!(count, "Trash emptied");
        Ok(count)
    }

    async fn delete_remote_copy(remote: Option<&Arc<dyn RemoteStore>>, record: &FileRecord) {
        let Some(remote) = remote else {
            tracing::warn!(
                file_id = record.id,
                message_id = record.remote_message_id,
                "Remote storage is not configured; remote copy was left behind"
            );
            return;
        };

        match remote.delete_message(record.remote_message_id).await {
            Ok(()) => {
                tracing::info!(file_id = record.id, "File purged");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file_id = record.id,
                    message_id = record.remote_message_id,
                    "File purged but its remote copy could not be deleted"
                );
            }
        }
    }
}
