//! Admin handlers for user accounts.

use axum::extract::{Path, Query, State};
use axum::Json;
use reeltrack_core::error::CoreError;
use reeltrack_core::types::DbId;
use reeltrack_db::models::user::{UpdateUserAccess, UserResponse};
use reeltrack_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::json::ValidJson;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let (limit, offset) = params.window();
    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(PaginatedResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// PUT /api/v1/users/{id}
///
/// Change role and/or active flag. Admins cannot demote or deactivate
/// themselves.
pub async fn update_access(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateUserAccess>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let demotes_self = input.role.as_deref().is_some_and(|r| r != admin.role);
    if id == admin.user_id && (demotes_self || input.is_active == Some(false)) {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot demote or deactivate their own account".into(),
        )));
    }

    let user = UserRepo::update_access(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        target_user_id = id,
        role = %user.role,
        is_active = user.is_active,
        admin_id = admin.user_id,
        "User access updated",
    );

    Ok(Json(DataResponse { data: user.into() }))
}
