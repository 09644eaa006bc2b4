//! Remote store abstraction
//!
//! This module defines the [`RemoteStore`] trait the ingest, download and purge
//! paths depend on.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use galleria_core::models::MediaKind;
use galleria_core::AppError;
use std::fmt;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

/// Remote store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The remote API answered but refused the call. `description` is its own wording.
    #[error("{description}")]
    Rejected {
        code: Option<i64>,
        description: String,
    },

    #[error("Remote file not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from remote store: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for remote store operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Rejected { description, .. } => AppError::Upstream(description),
            StorageError::NotFound(_) => AppError::NotFound("File not found in remote storage".to_string()),
            StorageError::Network(msg) => {
                AppError::Upstream(format!("Remote storage unreachable: {}", msg))
            }
            StorageError::InvalidResponse(msg) => AppError::Upstream(msg),
            StorageError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
        }
    }
}

/// Byte stream relayed from the remote store.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A spooled upload ready to be sent to the remote store.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub kind: MediaKind,
    /// Local file holding the complete payload.
    pub path: &'a Path,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size: u64,
    pub caption: &'a str,
}

/// What the remote store returned for a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub file_handle: String,
    pub thumbnail_handle: Option<String>,
    /// Size reported by the remote store, or the uploaded size when it reports none.
    pub size_bytes: i64,
    /// Needed to remove the remote copy later.
    pub message_id: i64,
}

/// A resolved remote file, ready to be relayed.
pub struct RemoteFile {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_range: Option<String>,
    /// True when the remote store answered a range request with partial content.
    pub partial: bool,
    pub stream: ByteStream,
}

impl fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("content_range", &self.content_range)
            .field("partial", &self.partial)
            .finish_non_exhaustive()
    }
}

/// Remote byte storage.
///
/// Implementations hold their own credentials; callers only pass handles and
/// message ids that came out of a previous [`RemoteStore::upload`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload the spooled file with the method matching its kind.
    async fn upload(&self, request: UploadRequest<'_>) -> StorageResult<StoredObject>;

    /// Resolve a handle and open a byte stream on it, forwarding an optional
    /// HTTP `Range` header value.
    async fn fetch(&self, file_handle: &str, range: Option<&str>) -> StorageResult<RemoteFile>;

    /// Delete the message carrying a stored file.
    ///
    /// Deleting an already-removed message fails; callers treat that as non-fatal.
    async fn delete_message(&self, message_id: i64) -> StorageResult<()>;
}
