//! Request-independent operations behind the handlers.
//!
//! Services take their collaborators explicitly so they can run against the
//! in-memory doubles in `test_helpers`.

pub mod accounting;
pub mod albums;
pub mod gallery;
pub mod ingest;
pub mod lifecycle;

pub use accounting::AccountingService;
pub use albums::AlbumService;
pub use gallery::GalleryService;
pub use ingest::{IngestRequest, IngestService};
pub use lifecycle::LifecycleService;
