//! Handlers for shots, nested under sequences for listing and creation.
//!
//! Frame ranges are checked across fields here: on update the incoming
//! bounds are merged with the stored ones before the check.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::error::CoreError;
use reeltrack_core::types::DbId;
use reeltrack_core::validation::validate_cut_range;
use reeltrack_db::models::shot::{CreateShot, Shot, UpdateShot};
use reeltrack_db::repositories::{CascadeSummary, ShotRepo};

use super::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::query::StatusListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn check_cut_range(cut_in: Option<i32>, cut_out: Option<i32>) -> AppResult<()> {
    validate_cut_range(cut_in, cut_out).map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}

/// POST /api/v1/sequences/{id}/shots
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sequence_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateShot>,
) -> AppResult<(StatusCode, Json<DataResponse<Shot>>)> {
    check_cut_range(input.cut_in, input.cut_out)?;
    ensure_exists(&state, EntityKind::Sequence, sequence_id).await?;
    let shot = ShotRepo::create(&state.pool, sequence_id, &input).await?;

    tracing::info!(
        shot_id = shot.id,
        sequence_id,
        code = %shot.code,
        user_id = user.user_id,
        "Shot created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: shot })))
}

/// GET /api/v1/sequences/{id}/shots
///
/// Ordered by `cut_in`; shots without a cut range come last.
pub async fn list_by_sequence(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(sequence_id): Path<DbId>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<PaginatedResponse<Shot>>> {
    ensure_exists(&state, EntityKind::Sequence, sequence_id).await?;
    let (limit, offset) = params.window();
    let status = params.status.as_deref();

    let data = ShotRepo::list_by_sequence(&state.pool, sequence_id, status, limit, offset).await?;
    let total = ShotRepo::count_by_sequence(&state.pool, sequence_id, status).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/shots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = ShotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Shot, id))?;
    Ok(Json(DataResponse { data: shot }))
}

/// PUT /api/v1/shots/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateShot>,
) -> AppResult<Json<DataResponse<Shot>>> {
    if input.cut_in.is_some() || input.cut_out.is_some() {
        let current = ShotRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Shot, id))?;
        check_cut_range(
            input.cut_in.or(current.cut_in),
            input.cut_out.or(current.cut_out),
        )?;
    }

    let shot = ShotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Shot, id))?;

    tracing::info!(shot_id = id, user_id = user.user_id, "Shot updated");

    Ok(Json(DataResponse { data: shot }))
}

/// DELETE /api/v1/shots/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = ShotRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Shot, id))?;

    tracing::info!(
        shot_id = id,
        user_id = user.user_id,
        versions = summary.versions,
        notes = summary.notes,
        "Shot deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}
