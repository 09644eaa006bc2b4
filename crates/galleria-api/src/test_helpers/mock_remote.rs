//! Doubles for the remote store and the auth backend.

use async_trait::async_trait;
use bytes::Bytes;
use galleria_core::models::MediaKind;
use galleria_core::AppError;
use galleria_storage::{
    RemoteFile, RemoteStore, StorageError, StorageResult, StoredObject, UploadRequest,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::{AuthProvider, Principal};

pub const VALID_TOKEN: &str = "valid-token";

/// An upload as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub caption: String,
    pub bytes: Vec<u8>,
    pub message_id: i64,
}

#[derive(Debug, Clone)]
struct StoredBytes {
    content_type: String,
    bytes: Vec<u8>,
}

/// In-memory remote store with injectable failures
#[derive(Clone)]
pub struct MockRemoteStore {
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    /// Spool paths of every upload attempt, rejected ones included.
    upload_paths: Arc<Mutex<Vec<PathBuf>>>,
    objects: Arc<Mutex<HashMap<String, StoredBytes>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
    failing_deletes: Arc<Mutex<HashSet<i64>>>,
    rejection: Arc<Mutex<Option<String>>>,
    next_message_id: Arc<AtomicI64>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            upload_paths: Arc::new(Mutex::new(Vec::new())),
            objects: Arc::new(Mutex::new(HashMap::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            failing_deletes: Arc::new(Mutex::new(HashSet::new())),
            rejection: Arc::new(Mutex::new(None)),
            next_message_id: Arc::new(AtomicI64::new(1000)),
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_paths(&self) -> Vec<PathBuf> {
        self.upload_paths.lock().unwrap().clone()
    }

    /// Message ids deleted successfully, in call order.
    pub fn deleted_messages(&self) -> Vec<i64> {
        self.deleted.lock().unwrap().clone()
    }

    /// Make deleting this message fail as if it were already gone.
    pub fn fail_delete_for(&self, message_id: i64) {
        self.failing_deletes.lock().unwrap().insert(message_id);
    }

    /// Reject every upload with the given bot API description.
    pub fn reject_uploads(&self, description: &str) {
        *self.rejection.lock().unwrap() = Some(description.to_string());
    }

    pub fn put_object(&self, handle: &str, content_type: &str, bytes: &[u8]) {
        self.objects.lock().unwrap().insert(
            handle.to_string(),
            StoredBytes {
                content_type: content_type.to_string(),
                bytes: bytes.to_vec(),
            },
        );
    }
}

impl Default for MockRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `bytes=start-end` or `bytes=start-` against a known length.
fn parse_range(range: &str, len: usize) -> Option<(usize, usize)> {
    let spec = range.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = if end.is_empty() {
        len.checked_sub(1)?
    } else {
        end.parse::<usize>().ok()?.min(len.checked_sub(1)?)
    };
    (start <= end).then_some((start, end))
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn upload(&self, request: UploadRequest<'_>) -> StorageResult<StoredObject> {
        self.upload_paths
            .lock()
            .unwrap()
            .push(request.path.to_path_buf());

        if let Some(description) = self.rejection.lock().unwrap().clone() {
            return Err(StorageError::Rejected {
                code: Some(400),
                description,
            });
        }

        let bytes = tokio::fs::read(request.path).await?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let file_handle = format!("remote-{}", message_id);
        let thumbnail_handle =
            (request.kind == MediaKind::Video).then(|| format!("thumb-{}", message_id));

        self.put_object(&file_handle, request.content_type, &bytes);
        let size_bytes = bytes.len() as i64;
        self.uploads.lock().unwrap().push(RecordedUpload {
            kind: request.kind,
            file_name: request.file_name.to_string(),
            content_type: request.content_type.to_string(),
            caption: request.caption.to_string(),
            bytes,
            message_id,
        });

        Ok(StoredObject {
            file_handle,
            thumbnail_handle,
            size_bytes,
            message_id,
        })
    }

    async fn fetch(&self, file_handle: &str, range: Option<&str>) -> StorageResult<RemoteFile> {
        let stored = self
            .objects
            .lock()
            .unwrap()
            .get(file_handle)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(file_handle.to_string()))?;

        let total = stored.bytes.len();
        let (body, content_range, partial) = match range.and_then(|r| parse_range(r, total)) {
            Some((start, end)) => (
                stored.bytes[start..=end].to_vec(),
                Some(format!("bytes {}-{}/{}", start, end, total)),
                true,
            ),
            None => (stored.bytes, None, false),
        };

        let content_length = Some(body.len() as u64);
        let chunks: Vec<Result<Bytes, StorageError>> = vec![Ok(Bytes::from(body))];
        Ok(RemoteFile {
            content_type: Some(stored.content_type),
            content_length,
            content_range,
            partial,
            stream: Box::pin(futures::stream::iter(chunks)),
        })
    }

    async fn delete_message(&self, message_id: i64) -> StorageResult<()> {
        if self.failing_deletes.lock().unwrap().contains(&message_id) {
            return Err(StorageError::Rejected {
                code: Some(400),
                description: "Bad Request: message to delete not found".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(message_id);
        Ok(())
    }
}

/// Accepts [`VALID_TOKEN`] only
#[derive(Clone, Default)]
pub struct MockAuthProvider {
    pub registered: bool,
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn verify_token(&self, token: &str) -> Result<Principal, AppError> {
        if token == VALID_TOKEN {
            Ok(Principal {
                user_id: "user-1".to_string(),
                email: Some("owner@example.com".to_string()),
            })
        } else {
            Err(AppError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ))
        }
    }

    async fn is_registered(&self) -> Result<bool, AppError> {
        Ok(self.registered)
    }
}
