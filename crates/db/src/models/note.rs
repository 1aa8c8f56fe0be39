//! Note model and DTOs.
//!
//! Notes link to any entity through `(link_type, link_id)`.

use reeltrack_core::sanitize::{sanitize_field, sanitize_optional, Sanitize};
use reeltrack_core::types::{DbId, Timestamp};
use reeltrack_core::validation::{
    validate_linkable_type, validate_name, validate_not_blank, validate_note_status,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub link_type: String,
    pub link_id: DbId,
    pub subject: String,
    pub content: String,
    pub status: String,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a note. The author is taken from the access token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    #[validate(custom(function = "validate_linkable_type"))]
    pub link_type: String,
    #[validate(range(min = 1))]
    pub link_id: DbId,
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub subject: String,
    #[validate(length(min = 1, max = 10000), custom(function = "validate_not_blank"))]
    pub content: String,
    #[validate(custom(function = "validate_note_status"))]
    pub status: Option<String>,
}

/// DTO for updating a note. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNote {
    #[validate(length(min = 1, max = 255), custom(function = "validate_name"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 10000), custom(function = "validate_not_blank"))]
    pub content: Option<String>,
    #[validate(custom(function = "validate_note_status"))]
    pub status: Option<String>,
}

/// Filters for [`crate::repositories::NoteRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub link_type: Option<String>,
    pub link_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub status: Option<String>,
}

impl Sanitize for CreateNote {
    fn sanitize(&mut self) {
        self.link_type = self.link_type.trim().to_string();
        sanitize_field(&mut self.subject);
        sanitize_field(&mut self.content);
    }
}

impl Sanitize for UpdateNote {
    fn sanitize(&mut self) {
        sanitize_optional(&mut self.subject);
        sanitize_optional(&mut self.content);
    }
}
