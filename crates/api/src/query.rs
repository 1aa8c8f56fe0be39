//! Shared query parameter types for API handlers.

use reeltrack_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use reeltrack_core::types::DbId;
use serde::Deserialize;

/// Clamp raw `limit` / `offset` parameters into a usable page window.
pub fn page_window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(offset),
    )
}

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// `?status=&limit=&offset=` for hierarchy listings.
#[derive(Debug, Default, Deserialize)]
pub struct StatusListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StatusListParams {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// Query parameters for `GET /versions`.
#[derive(Debug, Default, Deserialize)]
pub struct VersionListParams {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub status: Option<String>,
    #[serde(default)]
    pub latest_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VersionListParams {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// Query parameters for `GET /versions/latest`.
#[derive(Debug, Deserialize)]
pub struct LatestVersionParams {
    pub entity_type: String,
    pub entity_id: DbId,
}

/// Query parameters for `GET /notes`.
#[derive(Debug, Default, Deserialize)]
pub struct NoteListParams {
    pub link_type: Option<String>,
    pub link_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NoteListParams {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}
