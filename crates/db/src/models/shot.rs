//! Shot entity model and DTOs.
//!
//! `frame_count` is a generated column (`cut_out - cut_in + 1`) and is
//! never written directly. Frame numbers are capped at ten million so the
//! generated count always fits in an `INTEGER`.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, trim_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{validate_code, validate_name, validate_task_status};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `shots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub sequence_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub cut_in: Option<i32>,
    pub cut_out: Option<i32>,
    pub frame_count: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new shot under a sequence.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShot {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub cut_in: Option<i32>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub cut_out: Option<i32>,
}

/// DTO for updating a shot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateShot {
    #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub cut_in: Option<i32>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub cut_out: Option<i32>,
}

impl Sanitize for CreateShot {
    fn sanitize(&mut self) {
        self.code = self.code.trim().to_string();
        sanitize_field(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}

impl Sanitize for UpdateShot {
    fn sanitize(&mut self) {
        trim_optional(&mut self.code);
        sanitize_optional(&mut self.name);
        sanitize_optional(&mut self.description);
    }
}
