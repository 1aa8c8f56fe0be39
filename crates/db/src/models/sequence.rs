//! Sequence entity model and DTOs.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, trim_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{validate_code, validate_name, validate_task_status};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `sequences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sequence {
    pub id: DbId,
    pub episode_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new sequence. The parent episode comes from the route.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSequence {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Defaults to `waiting` if omitted.
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
}

/// DTO for updating an existing sequence. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSequence {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
}

impl Sanitize for CreateSequence {
    fn sanitize(&mut self) {
        self.code = self.code.trim().to_string();
        sanitize_field(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}

impl Sanitize for UpdateSequence {
    fn sanitize(&mut self) {
        trim_optional(&mut self.code);
        sanitize_optional(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}
