//! Handlers for playlists and their ordered version entries.
//!
//! Reading is open to every authenticated user; creating, editing and
//! reordering playlists requires a producer or admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::playlist::{
    AddPlaylistVersion, CreatePlaylist, Playlist, PlaylistEntry, ReorderPlaylist, UpdatePlaylist,
};
use reeltrack_db::repositories::{CascadeSummary, EntityRepo, PlaylistRepo};
use validator::Validate;

use super::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::{json_rejection, ValidJson};
use crate::middleware::rbac::RequireManager;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

async fn find_playlist(state: &AppState, id: DbId) -> AppResult<Playlist> {
    PlaylistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Playlist, id))
}

/// POST /api/v1/projects/{id}/playlists
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreatePlaylist>,
) -> AppResult<(StatusCode, Json<DataResponse<Playlist>>)> {
    ensure_exists(&state, EntityKind::Project, project_id).await?;
    let playlist =
        PlaylistRepo::create(&state.pool, project_id, Some(user.user_id), &input).await?;

    tracing::info!(
        playlist_id = playlist.id,
        project_id,
        code = %playlist.code,
        user_id = user.user_id,
        "Playlist created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: playlist })))
}

/// GET /api/v1/projects/{id}/playlists
pub async fn list_by_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<Playlist>>> {
    ensure_exists(&state, EntityKind::Project, project_id).await?;
    let (limit, offset) = params.window();

    let data = PlaylistRepo::list_by_project(&state.pool, project_id, limit, offset).await?;
    let total = PlaylistRepo::count_by_project(&state.pool, project_id).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/playlists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    let playlist = find_playlist(&state, id).await?;
    Ok(Json(DataResponse { data: playlist }))
}

/// PUT /api/v1/playlists/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdatePlaylist>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    let playlist = PlaylistRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Playlist, id))?;

    tracing::info!(playlist_id = id, user_id = user.user_id, "Playlist updated");

    Ok(Json(DataResponse { data: playlist }))
}

/// DELETE /api/v1/playlists/{id}
///
/// The versions themselves are untouched; only the entries go.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = PlaylistRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Playlist, id))?;

    tracing::info!(playlist_id = id, user_id = user.user_id, "Playlist deleted");

    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// GET /api/v1/playlists/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PlaylistEntry>>>> {
    find_playlist(&state, id).await?;
    let entries = PlaylistRepo::list_versions(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/playlists/{id}/versions
///
/// Appends the version, or inserts it at `position` (clamped to the end).
/// The version must belong to the playlist's project.
pub async fn add_version(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    payload: Result<Json<AddPlaylistVersion>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<PlaylistEntry>>>)> {
    let Json(input) = payload.map_err(json_rejection)?;
    input.validate()?;

    let playlist = find_playlist(&state, id).await?;
    let version_project =
        EntityRepo::project_id_of(&state.pool, EntityKind::Version, input.version_id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Version, input.version_id))?;
    if version_project != playlist.project_id {
        return Err(AppError::BadRequest(format!(
            "Version {} belongs to a different project than playlist {id}",
            input.version_id
        )));
    }

    let entries = PlaylistRepo::add_version(&state.pool, id, input.version_id, input.position)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Playlist, id))?;

    tracing::info!(
        playlist_id = id,
        version_id = input.version_id,
        position = ?input.position,
        user_id = user.user_id,
        "Version added to playlist",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entries })))
}

/// PUT /api/v1/playlists/{id}/versions/reorder
///
/// `version_ids` must name every current entry exactly once.
pub async fn reorder(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    payload: Result<Json<ReorderPlaylist>, JsonRejection>,
) -> AppResult<Json<DataResponse<Vec<PlaylistEntry>>>> {
    let Json(input) = payload.map_err(json_rejection)?;
    input.validate()?;

    find_playlist(&state, id).await?;
    let entries = PlaylistRepo::reorder(&state.pool, id, &input.version_ids)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(
                "version_ids must list every version in the playlist exactly once".into(),
            )
        })?;

    tracing::info!(
        playlist_id = id,
        entries = entries.len(),
        user_id = user.user_id,
        "Playlist reordered",
    );

    Ok(Json(DataResponse { data: entries }))
}

/// DELETE /api/v1/playlists/{id}/versions/{version_id}
pub async fn remove_version(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path((id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_playlist(&state, id).await?;
    if !PlaylistRepo::remove_version(&state.pool, id, version_id).await? {
        return Err(AppError::not_found(EntityKind::Version, version_id));
    }

    tracing::info!(
        playlist_id = id,
        version_id,
        user_id = user.user_id,
        "Version removed from playlist",
    );

    Ok(StatusCode::NO_CONTENT)
}
