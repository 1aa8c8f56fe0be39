//! Handlers for the `/notes` resource.
//!
//! Notes attach to any entity through `link_type` + `link_id`. Only the
//! author or an admin may edit or delete a note.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::error::CoreError;
use reeltrack_core::types::DbId;
use reeltrack_db::models::note::{CreateNote, Note, NoteFilter, UpdateNote};
use reeltrack_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::query::NoteListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Load a note and check that `user` may modify it.
async fn find_editable(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Note> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    if note.author_id != Some(user.user_id) && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or an admin may modify this note".into(),
        )));
    }
    Ok(note)
}

/// POST /api/v1/notes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    let kind: EntityKind = input.link_type.parse()?;
    let note = NoteRepo::create(&state.pool, kind, Some(user.user_id), &input)
        .await?
        .ok_or_else(|| AppError::not_found(kind, input.link_id))?;

    tracing::info!(
        note_id = note.id,
        link_type = %kind,
        link_id = note.link_id,
        user_id = user.user_id,
        "Note created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/notes?link_type=&link_id=&author_id=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<NoteListParams>,
) -> AppResult<Json<PaginatedResponse<Note>>> {
    if let Some(link_type) = params.link_type.as_deref() {
        link_type.parse::<EntityKind>()?;
    }
    let (limit, offset) = params.window();
    let filter = NoteFilter {
        link_type: params.link_type,
        link_id: params.link_id,
        author_id: params.author_id,
        status: params.status,
    };

    let data = NoteRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = NoteRepo::count(&state.pool, &filter).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/notes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Note>>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    Ok(Json(DataResponse { data: note }))
}

/// PUT /api/v1/notes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateNote>,
) -> AppResult<Json<DataResponse<Note>>> {
    find_editable(&state, &user, id).await?;
    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    tracing::info!(note_id = id, user_id = user.user_id, "Note updated");

    Ok(Json(DataResponse { data: note }))
}

/// DELETE /api/v1/notes/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_editable(&state, &user, id).await?;
    if !NoteRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Note", id }));
    }

    tracing::info!(note_id = id, user_id = user.user_id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}
