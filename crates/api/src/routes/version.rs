//! Route definitions for the `/versions` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::version;
use crate::state::AppState;

/// Routes mounted at `/versions`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /latest            -> latest
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PUT    /{id}/set-latest   -> set_latest
/// POST   /{id}/upload       -> upload (multipart)
/// ```
///
/// The upload route lifts axum's default body limit; the handler enforces
/// `MAX_UPLOAD_BYTES` while streaming.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(version::list).post(version::create))
        .route("/latest", get(version::latest))
        .route(
            "/{id}",
            get(version::get_by_id)
                .put(version::update)
                .delete(version::delete),
        )
        .route("/{id}/set-latest", put(version::set_latest))
        .route(
            "/{id}/upload",
            post(version::upload).layer(DefaultBodyLimit::disable()),
        )
}
