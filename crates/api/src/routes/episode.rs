//! Route definitions for the `/episodes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{episode, sequence};
use crate::state::AppState;

/// Routes mounted at `/episodes`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/sequences   -> sequence::list_by_episode
/// POST   /{id}/sequences   -> sequence::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(episode::get_by_id)
                .put(episode::update)
                .delete(episode::delete),
        )
        .route(
            "/{id}/sequences",
            get(sequence::list_by_episode).post(sequence::create),
        )
}
