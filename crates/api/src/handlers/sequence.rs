//! Handlers for sequences, nested under episodes for listing and creation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::sequence::{CreateSequence, Sequence, UpdateSequence};
use reeltrack_db::repositories::{CascadeSummary, SequenceRepo};

use super::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::rbac::RequireManager;
use crate::query::StatusListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/v1/episodes/{id}/sequences
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(episode_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateSequence>,
) -> AppResult<(StatusCode, Json<DataResponse<Sequence>>)> {
    ensure_exists(&state, EntityKind::Episode, episode_id).await?;
    let sequence = SequenceRepo::create(&state.pool, episode_id, &input).await?;

    tracing::info!(
        sequence_id = sequence.id,
        episode_id,
        code = %sequence.code,
        user_id = user.user_id,
        "Sequence created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: sequence })))
}

/// GET /api/v1/episodes/{id}/sequences
pub async fn list_by_episode(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(episode_id): Path<DbId>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<PaginatedResponse<Sequence>>> {
    ensure_exists(&state, EntityKind::Episode, episode_id).await?;
    let (limit, offset) = params.window();
    let status = params.status.as_deref();

    let data = SequenceRepo::list_by_episode(&state.pool, episode_id, status, limit, offset).await?;
    let total = SequenceRepo::count_by_episode(&state.pool, episode_id, status).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/sequences/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Sequence>>> {
    let sequence = SequenceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Sequence, id))?;
    Ok(Json(DataResponse { data: sequence }))
}

/// PUT /api/v1/sequences/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateSequence>,
) -> AppResult<Json<DataResponse<Sequence>>> {
    let sequence = SequenceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Sequence, id))?;

    tracing::info!(sequence_id = id, user_id = user.user_id, "Sequence updated");

    Ok(Json(DataResponse { data: sequence }))
}

/// DELETE /api/v1/sequences/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = SequenceRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Sequence, id))?;

    tracing::info!(
        sequence_id = id,
        user_id = user.user_id,
        shots = summary.shots,
        assets = summary.assets,
        "Sequence deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}
