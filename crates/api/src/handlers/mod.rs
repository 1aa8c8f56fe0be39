//! HTTP handlers, one module per resource.
//!
//! Handlers parse input, check parents and permissions, call the
//! repositories and wrap results in the response envelopes.

pub mod asset;
pub mod auth;
pub mod episode;
pub mod note;
pub mod playlist;
pub mod project;
pub mod sequence;
pub mod shot;
pub mod user;
pub mod version;

use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::repositories::EntityRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// 404 unless the `kind` row with `id` exists.
pub(crate) async fn ensure_exists(state: &AppState, kind: EntityKind, id: DbId) -> AppResult<()> {
    if EntityRepo::exists(&state.pool, kind, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found(kind, id))
    }
}
