//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::project::{CreateProject, Project, UpdateProject};
use reeltrack_db::repositories::{CascadeSummary, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::rbac::RequireManager;
use crate::query::StatusListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = ProjectRepo::create(&state.pool, Some(user.user_id), &input).await?;

    tracing::info!(
        project_id = project.id,
        code = %project.code,
        user_id = user.user_id,
        "Project created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects?status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<PaginatedResponse<Project>>> {
    let (limit, offset) = params.window();
    let status = params.status.as_deref();

    let data = ProjectRepo::list(&state.pool, status, limit, offset).await?;
    let total = ProjectRepo::count(&state.pool, status).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Project, id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Project, id))?;

    tracing::info!(project_id = id, user_id = user.user_id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the whole subtree. Responds with the number of descendants removed.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Project, id))?;

    tracing::info!(
        project_id = id,
        user_id = user.user_id,
        episodes = summary.episodes,
        versions = summary.versions,
        notes = summary.notes,
        "Project deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}
