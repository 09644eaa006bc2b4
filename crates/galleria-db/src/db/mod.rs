//! Database repositories for data access layer
//!
//! `file` holds the Media Store and the lifecycle transitions, `album` the Album
//! Store and the file/album link table, `storage_metrics` the accounting queries.
//! Services depend on the traits in `traits` so they can run against in-memory doubles.

pub mod album;
pub mod file;
pub mod storage_metrics;
pub mod traits;

pub use album::AlbumRepository;
pub use file::FileRepository;
pub use storage_metrics::StorageMetricsRepository;
pub use traits::{
    AlbumRepositoryTrait, FileRepositoryTrait, FileScope, StorageMetricsRepositoryTrait,
};
