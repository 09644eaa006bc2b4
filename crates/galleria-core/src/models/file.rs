use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::album::AlbumSummary;

const DEFAULT_PER_PAGE: i64 = 24;
const MAX_PER_PAGE: i64 = 100;
/// Keeps `offset()` within `i64` for every accepted page size.
const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Media kind, decided once at upload time from the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    /// `image/*` is a photo, `video/*` is a video, anything else is a document.
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image/") {
            MediaKind::Photo
        } else if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Document
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a file record. `Purged` is never observed on a stored row:
/// purging removes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Active,
    Trashed,
    Purged,
}

/// A row of the `files` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct FileRecord {
    pub id: i64,
    /// Opaque handle issued by the remote store. Never rewritten after insert.
    pub file_handle: String,
    pub thumbnail_handle: Option<String>,
    pub caption: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub remote_message_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn state(&self) -> LifecycleState {
        if self.deleted_at.is_some() {
            LifecycleState::Trashed
        } else {
            LifecycleState::Active
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn into_response(self, albums: Vec<AlbumSummary>) -> FileResponse {
        FileResponse {
            state: self.state(),
            id: self.id,
            file_handle: self.file_handle,
            thumbnail_handle: self.thumbnail_handle,
            caption: self.caption,
            kind: self.kind,
            content_type: self.content_type,
            file_name: self.file_name,
            size_bytes: self.size_bytes,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
            albums,
        }
    }
}

/// Values needed to insert a file record after the remote upload succeeded.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub file_handle: String,
    pub thumbnail_handle: Option<String>,
    pub caption: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub remote_message_id: i64,
}

/// Complete, authoritative view of a file including its album relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: i64,
    pub file_handle: String,
    pub thumbnail_handle: Option<String>,
    pub caption: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub state: LifecycleState,
    pub albums: Vec<AlbumSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Largest,
    Smallest,
    Caption,
}

impl SortOrder {
    /// SQL `ORDER BY` clause. Ties are broken by id so paging is stable.
    pub fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at DESC, id DESC",
            SortOrder::Oldest => "created_at ASC, id ASC",
            SortOrder::Largest => "size_bytes DESC, id DESC",
            SortOrder::Smallest => "size_bytes ASC, id ASC",
            SortOrder::Caption => "lower(caption) ASC, id ASC",
        }
    }
}

/// Gallery query parameters as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListQuery {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub kind: Option<MediaKind>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

/// Normalized filter passed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub caption: Option<String>,
    pub kind: Option<MediaKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub album_id: Option<i64>,
    pub sort: SortOrder,
    pub page: i64,
    pub per_page: i64,
}

impl Default for FileFilter {
    fn default() -> Self {
        FileListQuery::default().into()
    }
}

impl From<FileListQuery> for FileFilter {
    fn from(query: FileListQuery) -> Self {
        FileFilter {
            caption: query
                .caption
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            kind: query.kind,
            from: query.from,
            to: query.to,
            album_id: query.album_id,
            sort: query.sort.unwrap_or_default(),
            page: query.page.unwrap_or(1).clamp(1, MAX_PAGE),
            per_page: query
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }
}

impl FileFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// True when `record` satisfies every filter criterion except album membership.
    pub fn matches(&self, record: &FileRecord) -> bool {
        if let Some(ref caption) = self.caption {
            if !record
                .caption
                .to_lowercase()
                .contains(&caption.to_lowercase())
            {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.created_at > to {
                return false;
            }
        }
        true
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Page {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Request DTO for updating a file's caption and/or album membership.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub caption: Option<String>,
    /// Replaces the complete set of album links when present.
    #[serde(default)]
    pub album_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkTrashRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Upload result. `album_link_error` reports a partial success: the file exists,
/// but some requested album links were not created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file: FileResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_link_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(caption: &str, kind: MediaKind) -> FileRecord {
        FileRecord {
            id: 1,
            file_handle: "AgAD".to_string(),
            thumbnail_handle: None,
            caption: caption.to_string(),
            kind,
            content_type: "image/png".to_string(),
            file_name: "a.png".to_string(),
            size_bytes: 10,
            remote_message_id: 7,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_classification_by_content_type_prefix() {
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Photo);
        assert_eq!(MediaKind::from_content_type("IMAGE/JPEG"), MediaKind::Photo);
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        assert_eq!(
            MediaKind::from_content_type("application/pdf"),
            MediaKind::Document
        );
        assert_eq!(MediaKind::from_content_type(""), MediaKind::Document);
        assert_eq!(
            MediaKind::from_content_type("audio/mpeg"),
            MediaKind::Document
        );
    }

    #[test]
    fn test_state_follows_deletion_timestamp() {
        let mut r = record("sunset", MediaKind::Photo);
        assert_eq!(r.state(), LifecycleState::Active);
        r.deleted_at = Some(Utc::now());
        assert_eq!(r.state(), LifecycleState::Trashed);
        assert!(r.is_trashed());
    }

    #[test]
    fn test_filter_defaults_and_clamping() {
        let filter = FileFilter::from(FileListQuery {
            caption: Some("   ".to_string()),
            page: Some(0),
            per_page: Some(1000),
            ..Default::default()
        });
        assert_eq!(filter.caption, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, 100);
        assert_eq!(filter.sort, SortOrder::Newest);
        assert_eq!(filter.offset(), 0);

        let filter = FileFilter::from(FileListQuery {
            page: Some(3),
            per_page: Some(10),
            ..Default::default()
        });
        assert_eq!(filter.offset(), 20);
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let filter = FileFilter::from(FileListQuery {
            page: Some(i64::MAX),
            per_page: Some(MAX_PER_PAGE),
            ..Default::default()
        });
        assert_eq!(filter.page, MAX_PAGE);
        assert!(filter.offset() > 0);

        let filter = FileFilter {
            page: i64::MAX,
            per_page: 24,
            ..Default::default()
        };
        assert_eq!(filter.offset(), i64::MAX);
    }

    #[test]
    fn test_filter_matches_caption_case_insensitively() {
        let filter = FileFilter {
            caption: Some("SUN".to_string()),
            kind: Some(MediaKind::Photo),
            ..Default::default()
        };
        assert!(filter.matches(&record("Sunset at the beach", MediaKind::Photo)));
        assert!(!filter.matches(&record("Sunset", MediaKind::Video)));
        assert!(!filter.matches(&record("moonrise", MediaKind::Photo)));
    }

    #[test]
    fn test_page_counts() {
        let page: Page<i32> = Page::new(vec![1, 2], 5, 1, 2);
        assert_eq!(page.total_pages, 3);
        let empty: Page<i32> = Page::new(vec![], 0, 1, 24);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_update_request_distinguishes_missing_album_ids() {
        let req: UpdateFileRequest = serde_json::from_str(r#"{"caption":"x"}"#).unwrap();
        assert!(req.album_ids.is_none());
        let req: UpdateFileRequest = serde_json::from_str(r#"{"album_ids":[]}"#).unwrap();
        assert_eq!(req.album_ids, Some(vec![]));
    }
}
