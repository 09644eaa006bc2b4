//! Bot API backed remote store.
//!
//! Files are posted to a configured chat with `sendPhoto`, `sendVideo` or
//! `sendDocument`. A handle resolves to a download path with `getFile`, and the
//! bytes are served from `/file/bot<token>/<path>`. Purging deletes the message.

use async_trait::async_trait;
use futures::TryStreamExt;
use galleria_core::models::MediaKind;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::traits::{
    RemoteFile, RemoteStore, StorageError, StorageResult, StoredObject, UploadRequest,
};

/// Longest caption the bot API accepts on a media message.
const MAX_CAPTION_CHARS: usize = 1024;

/// Connection settings for [`TelegramStore`]
#[derive(Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout: Duration,
}

/// Remote store on top of the bot HTTP API
#[derive(Clone)]
pub struct TelegramStore {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl Debug for TelegramStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TelegramStore")
            .field("api_url", &self.api_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Envelope of every bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> StorageResult<T> {
        if !self.ok {
            return Err(StorageError::Rejected {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "Remote store rejected the request".to_string()),
            });
        }
        self.result
            .ok_or_else(|| StorageError::InvalidResponse("response has no result".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct RemoteMedia {
    file_id: String,
    file_size: Option<i64>,
    thumbnail: Option<Box<RemoteMedia>>,
    // Older API versions
    thumb: Option<Box<RemoteMedia>>,
}

impl RemoteMedia {
    fn thumbnail_handle(&self) -> Option<String> {
        self.thumbnail
            .as_ref()
            .or(self.thumb.as_ref())
            .map(|t| t.file_id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
    #[serde(default)]
    photo: Vec<RemoteMedia>,
    video: Option<RemoteMedia>,
    document: Option<RemoteMedia>,
}

#[derive(Debug, Deserialize)]
struct RemoteFilePath {
    file_path: Option<String>,
}

/// Pick the handles out of an upload response.
///
/// Photos come back as resolution variants ordered smallest first, so the last
/// one is kept.
fn stored_object(kind: MediaKind, message: Message, uploaded_size: u64) -> StorageResult<StoredObject> {
    let media = match kind {
        MediaKind::Photo => message.photo.into_iter().last(),
        MediaKind::Video => message.video,
        MediaKind::Document => message.document,
    }
    .ok_or_else(|| {
        StorageError::InvalidResponse(format!("upload response carries no {} entry", kind))
    })?;

    Ok(StoredObject {
        thumbnail_handle: media.thumbnail_handle(),
        size_bytes: media
            .file_size
            .unwrap_or_else(|| i64::try_from(uploaded_size).unwrap_or(i64::MAX)),
        file_handle: media.file_id,
        message_id: message.message_id,
    })
}

fn upload_method(kind: MediaKind) -> (&'static str, &'static str) {
    match kind {
        MediaKind::Photo => ("sendPhoto", "photo"),
        MediaKind::Video => ("sendVideo", "video"),
        MediaKind::Document => ("sendDocument", "document"),
    }
}

fn truncate_caption(caption: &str) -> String {
    caption.chars().take(MAX_CAPTION_CHARS).collect()
}

impl TelegramStore {
    pub fn new(config: TelegramConfig) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token,
            chat_id: config.chat_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.bot_token, file_path)
    }

    /// Decode the JSON envelope. The bot API reports failures in the body even
    /// on non-2xx statuses.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> StorageResult<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let envelope: ApiResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            StorageError::InvalidResponse(format!("status {}: {}", status, e))
        })?;
        envelope.into_result()
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> StorageResult<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    /// Resolve a handle to its download path.
    async fn resolve(&self, file_handle: &str) -> StorageResult<String> {
        let file: RemoteFilePath = self
            .call("getFile", json!({ "file_id": file_handle }))
            .await
            .map_err(|e| match e {
                StorageError::Rejected {
                    code: Some(400), ..
                } => StorageError::NotFound(file_handle.to_string()),
                other => other,
            })?;

        file.file_path
            .ok_or_else(|| StorageError::NotFound(file_handle.to_string()))
    }
}

#[async_trait]
impl RemoteStore for TelegramStore {
    #[tracing::instrument(skip(self, request), fields(kind = %request.kind, size = request.size))]
    async fn upload(&self, request: UploadRequest<'_>) -> StorageResult<StoredObject> {
        let (method, field) = upload_method(request.kind);

        let file = tokio::fs::File::open(request.path).await?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, request.size)
            .file_name(request.file_name.to_string())
            .mime_str(request.content_type)
            .map_err(|_| StorageError::Rejected {
                code: None,
                description: format!("Unsupported content type: {}", request.content_type),
            })?;

        let mut form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .part(field, part);
        if !request.caption.is_empty() {
            form = form.text("caption", truncate_caption(request.caption));
        }
        if request.kind == MediaKind::Video {
            form = form.text("supports_streaming", "true");
        }

        let response = self
            .client
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let message: Message = Self::parse(response).await?;
        let stored = stored_object(request.kind, message, request.size)?;

        tracing::info!(
            message_id = stored.message_id,
            has_thumbnail = stored.thumbnail_handle.is_some(),
            "File stored remotely"
        );
        Ok(stored)
    }

    #[tracing::instrument(skip(self, file_handle))]
    async fn fetch(&self, file_handle: &str, range: Option<&str>) -> StorageResult<RemoteFile> {
        let file_path = self.resolve(file_handle).await?;

        let mut request = self.client.get(self.file_url(&file_path));
        if let Some(range) = range {
            request = request.header(RANGE, range);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::PARTIAL_CONTENT => {}
            StatusCode::NOT_FOUND => return Err(StorageError::NotFound(file_handle.to_string())),
            other => {
                return Err(StorageError::Rejected {
                    code: Some(i64::from(other.as_u16())),
                    description: format!("File download failed with status {}", other),
                })
            }
        }

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v: &reqwest::header::HeaderValue| v.to_str().ok())
                .map(String::from)
        };
        let content_type = header(CONTENT_TYPE);
        let content_range = header(CONTENT_RANGE);
        let content_length = header(CONTENT_LENGTH).and_then(|v| v.parse::<u64>().ok());
        let ranges_supported = header(ACCEPT_RANGES).is_some();

        tracing::debug!(
            status = %status,
            content_length = ?content_length,
            ranges_supported,
            "Relaying remote file"
        );

        let stream = response
            .bytes_stream()
            .map_err(|e| StorageError::Network(e.to_string()));

        Ok(RemoteFile {
            content_type,
            content_length,
            content_range,
            partial: status == StatusCode::PARTIAL_CONTENT,
            stream: Box::pin(stream),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_message(&self, message_id: i64) -> StorageResult<()> {
        let _: bool = self
            .call(
                "deleteMessage",
                json!({ "chat_id": self.chat_id, "message_id": message_id }),
            )
            .await?;
        Ok(())
    }
}
