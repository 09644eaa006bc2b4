//! Application state shared by every handler.

use galleria_core::{AppError, Config};
use galleria_db::{AlbumRepositoryTrait, FileRepositoryTrait, StorageMetricsRepositoryTrait};
use galleria_storage::RemoteStore;
use std::sync::Arc;

use crate::auth::AuthProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub files: Arc<dyn FileRepositoryTrait>,
    pub albums: Arc<dyn AlbumRepositoryTrait>,
    pub metrics: Arc<dyn StorageMetricsRepositoryTrait>,
    /// `None` when the bot credentials are not configured.
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// The remote store, or a server configuration error when it is not set up.
    pub fn remote_store(&self) -> Result<Arc<dyn RemoteStore>, AppError> {
        self.remote.clone().ok_or_else(|| {
            AppError::Configuration(
                "Remote storage is not configured: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
                    .to_string(),
            )
        })
    }
}
