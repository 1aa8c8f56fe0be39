//! Handlers for episodes, nested under projects for listing and creation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::episode::{CreateEpisode, Episode, UpdateEpisode};
use reeltrack_db::repositories::{CascadeSummary, EpisodeRepo};

use super::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::rbac::RequireManager;
use crate::query::StatusListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/v1/projects/{id}/episodes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateEpisode>,
) -> AppResult<(StatusCode, Json<DataResponse<Episode>>)> {
    ensure_exists(&state, EntityKind::Project, project_id).await?;
    let episode = EpisodeRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(
        episode_id = episode.id,
        project_id,
        code = %episode.code,
        user_id = user.user_id,
        "Episode created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: episode })))
}

/// GET /api/v1/projects/{id}/episodes
pub async fn list_by_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<PaginatedResponse<Episode>>> {
    ensure_exists(&state, EntityKind::Project, project_id).await?;
    let (limit, offset) = params.window();
    let status = params.status.as_deref();

    let data = EpisodeRepo::list_by_project(&state.pool, project_id, status, limit, offset).await?;
    let total = EpisodeRepo::count_by_project(&state.pool, project_id, status).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/episodes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Episode>>> {
    let episode = EpisodeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Episode, id))?;
    Ok(Json(DataResponse { data: episode }))
}

/// PUT /api/v1/episodes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateEpisode>,
) -> AppResult<Json<DataResponse<Episode>>> {
    let episode = EpisodeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Episode, id))?;

    tracing::info!(episode_id = id, user_id = user.user_id, "Episode updated");

    Ok(Json(DataResponse { data: episode }))
}

/// DELETE /api/v1/episodes/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = EpisodeRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Episode, id))?;

    tracing::info!(
        episode_id = id,
        user_id = user.user_id,
        sequences = summary.sequences,
        versions = summary.versions,
        "Episode deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}
