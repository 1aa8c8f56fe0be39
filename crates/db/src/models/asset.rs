//! Asset entity model and DTOs.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, trim_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{
    validate_asset_type, validate_code, validate_name, validate_task_status,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub sequence_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub asset_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new asset under a sequence.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
    /// Defaults to `other` if omitted.
    #[validate(custom(function = "validate_asset_type"))]
    pub asset_type: Option<String>,
}

/// DTO for updating an asset. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_asset_type"))]
    pub asset_type: Option<String>,
}

impl Sanitize for CreateAsset {
    fn sanitize(&mut self) {
        self.code = self.code.trim().to_string();
        sanitize_field(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}

impl Sanitize for UpdateAsset {
    fn sanitize(&mut self) {
        trim_optional(&mut self.code);
        sanitize_optional(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}
