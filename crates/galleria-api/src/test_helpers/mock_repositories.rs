//! In-memory repository doubles.
//!
//! [`MockFileRepository`] owns the link table so that [`MockAlbumRepository`]
//! and album filtering in file listings see the same links.

use async_trait::async_trait;
use chrono::Utc;
use galleria_core::models::{
    Album, AlbumResponse, AlbumSummary, FileFilter, FileRecord, FileTotals, NewFileRecord, Page,
    SortOrder,
};
use galleria_core::AppError;
use galleria_db::{
    AlbumRepositoryTrait, FileRepositoryTrait, FileScope, StorageMetricsRepositoryTrait,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

type Links = Arc<Mutex<BTreeSet<(i64, i64)>>>;

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolClosed)
}

/// Mock file repository for testing without database
#[derive(Clone)]
pub struct MockFileRepository {
    files: Arc<Mutex<BTreeMap<i64, FileRecord>>>,
    /// `(file_id, album_id)` pairs
    links: Links,
    next_id: Arc<AtomicI64>,
    fail_create: Arc<AtomicBool>,
    restore_before_purge: Arc<Mutex<Option<i64>>>,
}

impl MockFileRepository {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            links: Arc::new(Mutex::new(BTreeSet::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_create: Arc::new(AtomicBool::new(false)),
            restore_before_purge: Arc::new(Mutex::new(None)),
        }
    }

    pub fn insert(&self, record: FileRecord) {
        self.next_id.fetch_max(record.id + 1, Ordering::SeqCst);
        self.files.lock().unwrap().insert(record.id, record);
    }

    pub fn record(&self, id: i64) -> Option<FileRecord> {
        self.files.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Mark a stored record as trashed.
    pub fn trash_now(&self, id: i64) {
        if let Some(record) = self.files.lock().unwrap().get_mut(&id) {
            record.deleted_at = Some(Utc::now());
        }
    }

    /// Make every subsequent `create` fail like a lost database connection.
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Restore `id` right before the next `purge_many`, like a concurrent restore request.
    pub fn restore_before_next_purge(&self, id: i64) {
        *self.restore_before_purge.lock().unwrap() = Some(id);
    }

    fn remove_where(&self, id: i64, trashed_only: bool) -> Option<FileRecord> {
        let mut files = self.files.lock().unwrap();
        let eligible = files
            .get(&id)
            .map(|r| !trashed_only || r.is_trashed())
            .unwrap_or(false);
        if !eligible {
            return None;
        }
        self.links.lock().unwrap().retain(|(file_id, _)| *file_id != id);
        files.remove(&id)
    }
}

impl Default for MockFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_records(records: &mut [FileRecord], sort: SortOrder) {
    match sort {
        SortOrder::Newest => records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id))),
        SortOrder::Oldest => records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id))),
        SortOrder::Largest => records.sort_by(|a, b| (b.size_bytes, b.id).cmp(&(a.size_bytes, a.id))),
        SortOrder::Smallest => records.sort_by(|a, b| (a.size_bytes, a.id).cmp(&(b.size_bytes, b.id))),
        SortOrder::Caption => records.sort_by(|a, b| {
            (a.caption.to_lowercase(), a.id).cmp(&(b.caption.to_lowercase(), b.id))
        }),
    }
}

#[async_trait]
impl FileRepositoryTrait for MockFileRepository {
    async fn create(&self, new: NewFileRecord) -> Result<FileRecord, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let record = FileRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            file_handle: new.file_handle,
            thumbnail_handle: new.thumbnail_handle,
            caption: new.caption,
            kind: new.kind,
            content_type: new.content_type,
            file_name: new.file_name,
            size_bytes: new.size_bytes,
            remote_message_id: new.remote_message_id,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.files.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        Ok(self.record(id))
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<FileRecord>, AppError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .values()
            .find(|r| r.file_handle == handle || r.thumbnail_handle.as_deref() == Some(handle))
            .cloned())
    }

    async fn list(
        &self,
        filter: &FileFilter,
        scope: FileScope,
    ) -> Result<Page<FileRecord>, AppError> {
        let links = self.links.lock().unwrap().clone();
        let mut records: Vec<FileRecord> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|r| match scope {
                FileScope::Active => !r.is_trashed(),
                FileScope::Trashed => r.is_trashed(),
            })
            .filter(|r| filter.matches(r))
            .filter(|r| {
                filter
                    .album_id
                    .map(|album_id| links.contains(&(r.id, album_id)))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        match scope {
            FileScope::Active => sort_records(&mut records, filter.sort),
            FileScope::Trashed => {
                records.sort_by(|a, b| (b.deleted_at, b.id).cmp(&(a.deleted_at, a.id)))
            }
        }

        let total = records.len() as i64;
        let items = records
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.per_page as usize)
            .collect();
        Ok(Page::new(items, total, filter.page, filter.per_page))
    }

    async fn update_caption(
        &self,
        id: i64,
        caption: &str,
    ) -> Result<Option<FileRecord>, AppError> {
        let mut files = self.files.lock().unwrap();
        Ok(files.get_mut(&id).map(|r| {
            r.caption = caption.to_string();
            r.clone()
        }))
    }

    async fn trash(&self, id: i64) -> Result<bool, AppError> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(&id) {
            Some(r) if !r.is_trashed() => {
                r.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn trash_many(&self, ids: &[i64]) -> Result<u64, AppError> {
        let mut count = 0;
        for id in ids {
            if self.trash(*id).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn restore(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let mut files = self.files.lock().unwrap();
        Ok(match files.get_mut(&id) {
            Some(r) if r.is_trashed() => {
                r.deleted_at = None;
                Some(r.clone())
            }
            _ => None,
        })
    }

    async fn purge(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        Ok(self.remove_where(id, true))
    }

    async fn hard_delete(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        Ok(self.remove_where(id, false))
    }

    async fn list_all_trashed(&self) -> Result<Vec<FileRecord>, AppError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.is_trashed())
            .cloned()
            .collect())
    }

    async fn purge_many(&self, ids: &[i64]) -> Result<Vec<FileRecord>, AppError> {
        let restored = self.restore_before_purge.lock().unwrap().take();
        if let Some(id) = restored {
            self.restore(id).await?;
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.remove_where(*id, true))
            .collect())
    }
}

/// Mock album repository sharing links with a [`MockFileRepository`]
#[derive(Clone)]
pub struct MockAlbumRepository {
    files: MockFileRepository,
    albums: Arc<Mutex<BTreeMap<i64, Album>>>,
    next_id: Arc<AtomicI64>,
    fail_link: Arc<AtomicBool>,
}

impl MockAlbumRepository {
    pub fn new(files: MockFileRepository) -> Self {
        Self {
            files,
            albums: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_link: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Insert an album and return its id.
    pub fn insert_album(&self, name: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.albums.lock().unwrap().insert(
            id,
            Album {
                id,
                name: name.to_string(),
                description: None,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn link_count(&self) -> usize {
        self.files.links.lock().unwrap().len()
    }

    /// Make `link_many` fail.
    pub fn fail_links(&self) {
        self.fail_link.store(true, Ordering::SeqCst);
    }

    fn with_count(&self, album: &Album) -> AlbumResponse {
        let links = self.files.links.lock().unwrap().clone();
        let file_count = links
            .iter()
            .filter(|(file_id, album_id)| {
                *album_id == album.id
                    && self
                        .files
                        .record(*file_id)
                        .map(|r| !r.is_trashed())
                        .unwrap_or(false)
            })
            .count() as i64;

        AlbumResponse {
            id: album.id,
            name: album.name.clone(),
            description: album.description.clone(),
            created_at: album.created_at,
            file_count,
        }
    }
}

#[async_trait]
impl AlbumRepositoryTrait for MockAlbumRepository {
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Album, AppError> {
        let id = self.insert_album(name);
        let mut albums = self.albums.lock().unwrap();
        let album = albums.get_mut(&id).ok_or_else(unavailable)?;
        album.description = description.map(str::to_string);
        Ok(album.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<AlbumResponse>, AppError> {
        let album = self.albums.lock().unwrap().get(&id).cloned();
        Ok(album.map(|a| self.with_count(&a)))
    }

    async fn list(&self) -> Result<Vec<AlbumResponse>, AppError> {
        let albums: Vec<Album> = self.albums.lock().unwrap().values().rev().cloned().collect();
        Ok(albums.iter().map(|a| self.with_count(a)).collect())
    }

    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<AlbumResponse>, AppError> {
        let updated = {
            let mut albums = self.albums.lock().unwrap();
            albums.get_mut(&id).map(|album| {
                if let Some(name) = name {
                    album.name = name.to_string();
                }
                if let Some(description) = description {
                    album.description = description.map(str::to_string);
                }
                album.clone()
            })
        };
        Ok(updated.map(|a| self.with_count(&a)))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self.albums.lock().unwrap().remove(&id).is_some();
        if removed {
            self.files
                .links
                .lock()
                .unwrap()
                .retain(|(_, album_id)| *album_id != id);
        }
        Ok(removed)
    }

    async fn link(&self, file_id: i64, album_id: i64) -> Result<bool, AppError> {
        Ok(self.files.links.lock().unwrap().insert((file_id, album_id)))
    }

    async fn unlink(&self, file_id: i64, album_id: i64) -> Result<bool, AppError> {
        Ok(self.files.links.lock().unwrap().remove(&(file_id, album_id)))
    }

    async fn link_many(&self, file_id: i64, album_ids: &[i64]) -> Result<u64, AppError> {
        if self.fail_link.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut links = self.files.links.lock().unwrap();
        Ok(album_ids
            .iter()
            .filter(|album_id| links.insert((file_id, **album_id)))
            .count() as u64)
    }

    async fn set_links(&self, file_id: i64, album_ids: &[i64]) -> Result<(), AppError> {
        let mut links = self.files.links.lock().unwrap();
        links.retain(|(f, _)| *f != file_id);
        for album_id in album_ids {
            links.insert((file_id, *album_id));
        }
        Ok(())
    }

    async fn albums_for_files(
        &self,
        file_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AlbumSummary>>, AppError> {
        let albums = self.albums.lock().unwrap();
        let links = self.files.links.lock().unwrap();
        let mut result: HashMap<i64, Vec<AlbumSummary>> = HashMap::new();
        for (file_id, album_id) in links.iter() {
            if !file_ids.contains(file_id) {
                continue;
            }
            if let Some(album) = albums.get(album_id) {
                result.entry(*file_id).or_default().push(AlbumSummary::from(album));
            }
        }
        for summaries in result.values_mut() {
            summaries.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        }
        Ok(result)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let albums = self.albums.lock().unwrap();
        Ok(ids.iter().copied().filter(|id| albums.contains_key(id)).collect())
    }
}

/// Fixed storage totals
#[derive(Clone)]
pub struct MockStorageMetrics {
    totals: FileTotals,
    database_bytes: Option<i64>,
}

impl MockStorageMetrics {
    pub fn new(totals: FileTotals, database_bytes: Option<i64>) -> Self {
        Self {
            totals,
            database_bytes,
        }
    }
}

#[async_trait]
impl StorageMetricsRepositoryTrait for MockStorageMetrics {
    async fn file_totals(&self) -> Result<FileTotals, AppError> {
        Ok(self.totals.clone())
    }

    async fn database_size(&self) -> Result<Option<i64>, AppError> {
        Ok(self.database_bytes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
