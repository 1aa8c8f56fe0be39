//! Route definitions for the `/projects` resource.
//!
//! Also nests episode and playlist listing/creation under `/projects/{id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{episode, playlist, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
///
/// GET    /{id}/episodes    -> episode::list_by_project
/// POST   /{id}/episodes    -> episode::create
/// GET    /{id}/playlists   -> playlist::list_by_project
/// POST   /{id}/playlists   -> playlist::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/episodes",
            get(episode::list_by_project).post(episode::create),
        )
        .route(
            "/{id}/playlists",
            get(playlist::list_by_project).post(playlist::create),
        )
}
