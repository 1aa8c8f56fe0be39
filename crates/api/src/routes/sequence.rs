//! Route definitions for the `/sequences` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{asset, sequence, shot};
use crate::state::AppState;

/// Routes mounted at `/sequences`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/shots    -> shot::list_by_sequence
/// POST   /{id}/shots    -> shot::create
/// GET    /{id}/assets   -> asset::list_by_sequence
/// POST   /{id}/assets   -> asset::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(sequence::get_by_id)
                .put(sequence::update)
                .delete(sequence::delete),
        )
        .route(
            "/{id}/shots",
            get(shot::list_by_sequence).post(shot::create),
        )
        .route(
            "/{id}/assets",
            get(asset::list_by_sequence).post(asset::create),
        )
}
