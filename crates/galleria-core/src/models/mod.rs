//! Data models for the application
//!
//! Each sub-module represents a feature area: files and their lifecycle, albums,
//! and storage accounting.

mod album;
mod file;
mod storage;

pub use album::*;
pub use file::*;
pub use storage::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `Option<Option<T>>` so that a missing field stays `None` (no change)
/// while an explicit `null` becomes `Some(None)` (clear the value).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
