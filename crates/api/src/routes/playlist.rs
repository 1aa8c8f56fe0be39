//! Route definitions for the `/playlists` resource and its entries.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::playlist;
use crate::state::AppState;

/// Routes mounted at `/playlists`.
///
/// ```text
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/versions                 -> list_versions
/// POST   /{id}/versions                 -> add_version
/// PUT    /{id}/versions/reorder         -> reorder
/// DELETE /{id}/versions/{version_id}    -> remove_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(playlist::get_by_id)
                .put(playlist::update)
                .delete(playlist::delete),
        )
        .route(
            "/{id}/versions",
            get(playlist::list_versions).post(playlist::add_version),
        )
        .route("/{id}/versions/reorder", put(playlist::reorder))
        .route(
            "/{id}/versions/{version_id}",
            delete(playlist::remove_version),
        )
}
