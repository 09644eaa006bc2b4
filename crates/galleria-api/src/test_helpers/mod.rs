//! Test helpers for service and router tests
//!
//! In-memory doubles of every collaborator, so no database, bot API or auth
//! backend is needed.

pub mod fixtures;
pub mod mock_remote;
pub mod mock_repositories;

pub use fixtures::*;
pub use mock_remote::*;
pub use mock_repositories::*;

use galleria_core::models::FileTotals;
use galleria_storage::RemoteStore;
use std::sync::Arc;

use crate::state::AppState;

/// Doubles behind an [`AppState`], kept so tests can arrange and inspect them.
pub struct TestContext {
    pub files: MockFileRepository,
    pub albums: MockAlbumRepository,
    pub remote: MockRemoteStore,
    pub state: Arc<AppState>,
}

pub struct TestStateBuilder {
    remote_configured: bool,
    registered: bool,
    max_upload_size_bytes: usize,
    totals: FileTotals,
    database_bytes: Option<i64>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            remote_configured: true,
            registered: false,
            max_upload_size_bytes: 1024 * 1024,
            totals: FileTotals::default(),
            database_bytes: Some(8 * 1024 * 1024),
        }
    }

    /// Build without bot credentials.
    pub fn without_remote(mut self) -> Self {
        self.remote_configured = false;
        self
    }

    pub fn registered(mut self, registered: bool) -> Self {
        self.registered = registered;
        self
    }

    pub fn max_upload_size_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_size_bytes = bytes;
        self
    }

    pub fn storage(mut self, totals: FileTotals, database_bytes: Option<i64>) -> Self {
        self.totals = totals;
        self.database_bytes = database_bytes;
        self
    }

    pub fn build(self) -> TestContext {
        let files = MockFileRepository::new();
        let albums = MockAlbumRepository::new(files.clone());
        let remote = MockRemoteStore::new();

        let state = Arc::new(AppState {
            config: test_config(self.max_upload_size_bytes),
            files: Arc::new(files.clone()),
            albums: Arc::new(albums.clone()),
            metrics: Arc::new(MockStorageMetrics::new(self.totals, self.database_bytes)),
            remote: if self.remote_configured {
                Some(Arc::new(remote.clone()) as Arc<dyn RemoteStore>)
            } else {
                None
            },
            auth: Arc::new(MockAuthProvider {
                registered: self.registered,
            }),
        });

        TestContext {
            files,
            albums,
            remote,
            state,
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
