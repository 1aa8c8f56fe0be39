//! Handlers for assets, nested under sequences for listing and creation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::asset::{Asset, CreateAsset, UpdateAsset};
use reeltrack_db::repositories::{AssetRepo, CascadeSummary};

use super::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::query::StatusListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/v1/sequences/{id}/assets
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sequence_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateAsset>,
) -> AppResult<(StatusCode, Json<DataResponse<Asset>>)> {
    ensure_exists(&state, EntityKind::Sequence, sequence_id).await?;
    let asset = AssetRepo::create(&state.pool, sequence_id, &input).await?;

    tracing::info!(
        asset_id = asset.id,
        sequence_id,
        code = %asset.code,
        asset_type = %asset.asset_type,
        user_id = user.user_id,
        "Asset created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/sequences/{id}/assets
pub async fn list_by_sequence(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(sequence_id): Path<DbId>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<PaginatedResponse<Asset>>> {
    ensure_exists(&state, EntityKind::Sequence, sequence_id).await?;
    let (limit, offset) = params.window();
    let status = params.status.as_deref();

    let data = AssetRepo::list_by_sequence(&state.pool, sequence_id, status, limit, offset).await?;
    let total = AssetRepo::count_by_sequence(&state.pool, sequence_id, status).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Asset, id))?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/assets/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateAsset>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Asset, id))?;

    tracing::info!(asset_id = id, user_id = user.user_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = AssetRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Asset, id))?;

    tracing::info!(
        asset_id = id,
        user_id = user.user_id,
        versions = summary.versions,
        "Asset deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}
