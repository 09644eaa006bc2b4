use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::double_option;

/// A row of the `albums` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Album with the number of active files linked to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AlbumResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub file_count: i64,
}

/// Compact album reference embedded in file responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AlbumSummary {
    pub id: i64,
    pub name: String,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        AlbumSummary {
            id: album.id,
            name: album.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlbumRequest {
    #[validate(length(min = 1, max = 255, message = "Album name must be 1-255 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateAlbumRequest {
    /// Trim the name and drop a blank description.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = normalize_description(self.description);
        self
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAlbumRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Album name must be 1-255 characters"))]
    pub name: Option<String>,
    /// Absent leaves the description untouched; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateAlbumRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.description = self.description.map(normalize_description);
        self
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct LinkFileRequest {
    pub file_id: i64,
}

/// `linked` is false when the pair already existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub linked: bool,
}
