//! Galleria Core Library
//!
//! Domain models, error types, configuration and formatting helpers shared by
//! the database, remote storage and HTTP crates.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GalleryConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::format_bytes;
