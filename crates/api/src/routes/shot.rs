use axum::routing::get;
use axum::Router;

use crate::handlers::shot;
use crate::state::AppState;

/// Routes mounted at `/shots`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(shot::get_by_id).put(shot::update).delete(shot::delete),
    )
}
