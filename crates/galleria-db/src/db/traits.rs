use std::collections::HashMap;

use galleria_core::models::{
    Album, AlbumResponse, AlbumSummary, FileFilter, FileRecord, FileTotals, NewFileRecord, Page,
};
use galleria_core::AppError;

/// Which side of the soft-delete line a listing reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    /// `deleted_at IS NULL`. The default gallery view.
    Active,
    /// `deleted_at IS NOT NULL`, newest deletion first.
    Trashed,
}

/// Media Store operations.
///
/// Every state transition is a single conditional statement, so a concurrent
/// loser simply matches zero rows.
#[async_trait::async_trait]
pub trait FileRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewFileRecord) -> Result<FileRecord, AppError>;

    /// Fetch a record in any lifecycle state.
    async fn get(&self, id: i64) -> Result<Option<FileRecord>, AppError>;

    /// Find the record owning a remote handle, either as its file or its thumbnail.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<FileRecord>, AppError>;

    async fn list(&self, filter: &FileFilter, scope: FileScope)
        -> Result<Page<FileRecord>, AppError>;

    /// Returns `None` when no record has this id.
    async fn update_caption(&self, id: i64, caption: &str)
        -> Result<Option<FileRecord>, AppError>;

    /// Active → trashed. `false` when no active record matched.
    async fn trash(&self, id: i64) -> Result<bool, AppError>;

    /// Bulk active → trashed, returns the number of records affected.
    async fn trash_many(&self, ids: &[i64]) -> Result<u64, AppError>;

    /// Trashed → active. `None` when no trashed record matched.
    async fn restore(&self, id: i64) -> Result<Option<FileRecord>, AppError>;

    /// Remove a trashed record, returning it so the caller can clean up remotely.
    async fn purge(&self, id: i64) -> Result<Option<FileRecord>, AppError>;

    /// Remove a record regardless of its state.
    async fn hard_delete(&self, id: i64) -> Result<Option<FileRecord>, AppError>;

    async fn list_all_trashed(&self) -> Result<Vec<FileRecord>, AppError>;

    /// Remove the given records if they are still trashed. Returns the removed rows.
    async fn purge_many(&self, ids: &[i64]) -> Result<Vec<FileRecord>, AppError>;
}

/// Album Store and link table operations.
#[async_trait::async_trait]
pub trait AlbumRepositoryTrait: Send + Sync {
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Album, AppError>;

    async fn get(&self, id: i64) -> Result<Option<AlbumResponse>, AppError>;

    async fn list(&self) -> Result<Vec<AlbumResponse>, AppError>;

    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<AlbumResponse>, AppError>;

    /// Delete the album and its links. Files are untouched.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Insert a link. Returns `false` when the pair already existed.
    async fn link(&self, file_id: i64, album_id: i64) -> Result<bool, AppError>;

    /// Remove a link. Returns `false` when there was nothing to remove.
    async fn unlink(&self, file_id: i64, album_id: i64) -> Result<bool, AppError>;

    /// Link the file to each album, ignoring existing pairs. Returns the number of new links.
    async fn link_many(&self, file_id: i64, album_ids: &[i64]) -> Result<u64, AppError>;

    /// Replace the file's complete set of album links atomically.
    async fn set_links(&self, file_id: i64, album_ids: &[i64]) -> Result<(), AppError>;

    async fn albums_for_files(
        &self,
        file_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AlbumSummary>>, AppError>;

    /// The subset of `ids` naming existing albums.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;
}

/// Storage accounting and readiness.
#[async_trait::async_trait]
pub trait StorageMetricsRepositoryTrait: Send + Sync {
    /// Totals over all file records, trashed ones included.
    async fn file_totals(&self) -> Result<FileTotals, AppError>;

    /// Size of the metadata database in bytes, `None` when the role lacks the privilege.
    async fn database_size(&self) -> Result<Option<i64>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
