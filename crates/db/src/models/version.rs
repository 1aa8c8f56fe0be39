//! Version entity model and DTOs.
//!
//! A version belongs to exactly one parent through `(entity_type, entity_id)`.
//! At most one version per parent carries `latest = true`.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, trim_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{
    validate_code, validate_name, validate_version_status, validate_versionable_type,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Version {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub version_number: i32,
    pub latest: bool,
    pub file_path: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new version.
///
/// `version_number` is assigned by the repository. `latest` defaults to `true`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVersion {
    #[validate(custom(function = "validate_versionable_type"))]
    pub entity_type: String,
    #[validate(range(min = 1))]
    pub entity_id: DbId,
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_version_status"))]
    pub status: Option<String>,
    pub latest: Option<bool>,
}

/// DTO for updating a version. All fields are optional.
///
/// `latest: Some(true)` promotes the version (clearing its siblings);
/// `latest: Some(false)` only clears this row.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVersion {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_version_status"))]
    pub status: Option<String>,
    pub latest: Option<bool>,
}

/// Filters for [`crate::repositories::VersionRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct VersionFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub status: Option<String>,
    pub latest_only: bool,
}

impl Sanitize for CreateVersion {
    fn sanitize(&mut self) {
        self.entity_type = self.entity_type.trim().to_string();
        self.code = self.code.trim().to_string();
        sanitize_field(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}

impl Sanitize for UpdateVersion {
    fn sanitize(&mut self) {
        trim_optional(&mut self.code);
        sanitize_optional(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}
