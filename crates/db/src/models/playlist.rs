//! Playlist model, DTOs and ordered version entries.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, trim_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{validate_code, validate_name};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::version::Version;

/// A row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A version as it appears in a playlist, with its 0-based position.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistEntry {
    pub position: i32,
    #[sqlx(flatten)]
    pub version: Version,
}

/// DTO for creating a playlist under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaylist {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// DTO for updating a playlist. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlaylist {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// DTO for adding a version to a playlist.
///
/// Without `position` the version is appended. With it, the version is
/// inserted there and later entries shift down by one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPlaylistVersion {
    #[validate(range(min = 1))]
    pub version_id: DbId,
    #[validate(range(min = 0))]
    pub position: Option<i32>,
}

/// DTO for reordering a playlist. Must list every current member exactly once.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderPlaylist {
    #[validate(length(min = 1, max = 1000))]
    pub version_ids: Vec<DbId>,
}

impl Sanitize for CreatePlaylist {
    fn sanitize(&mut self) {
        self.code = self.code.trim().to_string();
        sanitize_field(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}

impl Sanitize for UpdatePlaylist {
    fn sanitize(&mut self) {
        trim_optional(&mut self.code);
        sanitize_optional(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}
