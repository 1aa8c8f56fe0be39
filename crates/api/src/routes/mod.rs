pub mod asset;
pub mod auth;
pub mod episode;
pub mod health;
pub mod note;
pub mod playlist;
pub mod project;
pub mod sequence;
pub mod shot;
pub mod user;
pub mod version;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Everything except register, login and refresh requires a Bearer token.
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout
/// /auth/me                                         current user
///
/// /users                                           list (admin)
/// /users/{id}                                      update role / active (admin)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete (manager)
/// /projects/{id}/episodes                          list, create
/// /projects/{id}/playlists                         list, create (manager)
///
/// /episodes/{id}                                   get, update, delete (manager)
/// /episodes/{id}/sequences                         list, create
///
/// /sequences/{id}                                  get, update, delete (manager)
/// /sequences/{id}/shots                            list, create
/// /sequences/{id}/assets                           list, create
///
/// /shots/{id}                                      get, update, delete
/// /assets/{id}                                     get, update, delete
///
/// /versions                                        list, create
/// /versions/latest                                 latest for a parent
/// /versions/{id}                                   get, update, delete
/// /versions/{id}/set-latest                        promote (PUT)
/// /versions/{id}/upload                            attach media (multipart POST)
///
/// /playlists/{id}                                  get, update, delete (manager)
/// /playlists/{id}/versions                         list, add (manager)
/// /playlists/{id}/versions/reorder                 reorder (manager, PUT)
/// /playlists/{id}/versions/{version_id}            remove (manager, DELETE)
///
/// /notes                                           list, create
/// /notes/{id}                                      get, update, delete (author or admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/episodes", episode::router())
        .nest("/sequences", sequence::router())
        .nest("/shots", shot::router())
        .nest("/assets", asset::router())
        .nest("/versions", version::router())
        .nest("/playlists", playlist::router())
        .nest("/notes", note::router())
}
