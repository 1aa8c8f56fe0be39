//! Handlers for the `/versions` resource.
//!
//! A version hangs off any hierarchy level through `entity_type` +
//! `entity_id`. The repository keeps exactly one latest version per parent;
//! these handlers only resolve parents and map missing rows to 404.

use std::path::PathBuf;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use reeltrack_db::models::version::{CreateVersion, UpdateVersion, Version, VersionFilter};
use reeltrack_db::repositories::{CascadeSummary, VersionRepo};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::ensure_exists;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::query::{LatestVersionParams, VersionListParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Media types accepted by the upload endpoint.
pub const SUPPORTED_MEDIA_EXTENSIONS: &[&str] =
    &["mp4", "mov", "webm", "exr", "png", "jpg", "jpeg", "tif", "tiff"];

/// POST /api/v1/versions
///
/// `version_number` is assigned per parent. Unless `latest` is `false`
/// the new version becomes the parent's latest.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateVersion>,
) -> AppResult<(StatusCode, Json<DataResponse<Version>>)> {
    let kind = EntityKind::parse_versionable(&input.entity_type)?;
    let version = VersionRepo::create(&state.pool, kind, Some(user.user_id), &input)
        .await?
        .ok_or_else(|| AppError::not_found(kind, input.entity_id))?;

    tracing::info!(
        version_id = version.id,
        entity_type = %kind,
        entity_id = version.entity_id,
        version_number = version.version_number,
        latest = version.latest,
        user_id = user.user_id,
        "Version created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/versions?entity_type=&entity_id=&status=&latest_only=&limit=&offset=
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<VersionListParams>,
) -> AppResult<Json<PaginatedResponse<Version>>> {
    if let Some(entity_type) = params.entity_type.as_deref() {
        EntityKind::parse_versionable(entity_type)?;
    }
    let (limit, offset) = params.window();
    let filter = VersionFilter {
        entity_type: params.entity_type,
        entity_id: params.entity_id,
        status: params.status,
        latest_only: params.latest_only,
    };

    let data = VersionRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = VersionRepo::count(&state.pool, &filter).await?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/versions/latest?entity_type=&entity_id=
///
/// 404 when the parent does not exist; `{"data": null}` when it has no
/// latest version.
pub async fn latest(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<LatestVersionParams>,
) -> AppResult<Json<DataResponse<Option<Version>>>> {
    let kind = EntityKind::parse_versionable(&params.entity_type)?;
    ensure_exists(&state, kind, params.entity_id).await?;
    let version = VersionRepo::find_latest(&state.pool, kind, params.entity_id).await?;
    Ok(Json(DataResponse { data: version }))
}

/// GET /api/v1/versions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Version>>> {
    let version = VersionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Version, id))?;
    Ok(Json(DataResponse { data: version }))
}

/// PUT /api/v1/versions/{id}
///
/// `latest: true` promotes this version and clears its siblings;
/// `latest: false` only clears this one.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateVersion>,
) -> AppResult<Json<DataResponse<Version>>> {
    let version = VersionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Version, id))?;

    tracing::info!(
        version_id = id,
        latest = version.latest,
        user_id = user.user_id,
        "Version updated",
    );

    Ok(Json(DataResponse { data: version }))
}

/// PUT /api/v1/versions/{id}/set-latest
pub async fn set_latest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Version>>> {
    let version = VersionRepo::set_latest(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Version, id))?;

    tracing::info!(
        version_id = id,
        entity_type = %version.entity_type,
        entity_id = version.entity_id,
        user_id = user.user_id,
        "Version set as latest",
    );

    Ok(Json(DataResponse { data: version }))
}

/// DELETE /api/v1/versions/{id}
///
/// If the version was latest, the highest remaining version of the same
/// parent takes over.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeSummary>>> {
    let summary = VersionRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Version, id))?;

    tracing::info!(
        version_id = id,
        user_id = user.user_id,
        notes = summary.notes,
        "Version deleted",
    );

    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// POST /api/v1/versions/{id}/upload
///
/// Multipart body with a `file` field. The file is streamed to
/// `UPLOAD_DIR/versions/{id}/<uuid>.<ext>`; a previously attached file is
/// removed once the new one is recorded.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<DataResponse<Version>>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if VersionRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found(EntityKind::Version, id));
    }

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let ext = media_extension(field.file_name().unwrap_or_default())?;
        let (relative, size) = store_upload(&state.config, id, &ext, &mut field).await?;

        let Some(attached) = VersionRepo::attach_file(&state.pool, id, &relative, size).await?
        else {
            discard(&state.config.upload_dir.join(&relative)).await;
            return Err(AppError::not_found(EntityKind::Version, id));
        };

        if let Some(previous) = &attached.replaced {
            discard(&state.config.upload_dir.join(previous)).await;
        }

        tracing::info!(
            version_id = id,
            file_path = %relative,
            size_bytes = size,
            user_id = user.user_id,
            "Version media uploaded",
        );

        return Ok(Json(DataResponse { data: attached.version }));
    }

    Err(AppError::BadRequest("Missing required 'file' field".into()))
}

/// Lower-cased extension of `file_name`, if it is a supported media type.
fn media_extension(file_name: &str) -> AppResult<String> {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::BadRequest(format!(
            "Unsupported media type '.{ext}'. Supported: {}",
            SUPPORTED_MEDIA_EXTENSIONS.join(", ")
        )))
    }
}

/// Stream a multipart field to disk, enforcing the size limit.
///
/// Returns the path relative to the upload directory and the byte count.
/// The partial file is removed on any error.
async fn store_upload(
    config: &ServerConfig,
    version_id: DbId,
    ext: &str,
    field: &mut Field<'_>,
) -> AppResult<(String, i64)> {
    let relative = PathBuf::from("versions")
        .join(version_id.to_string())
        .join(format!("{}.{ext}", Uuid::new_v4()));
    let absolute = config.upload_dir.join(&relative);

    if let Some(dir) = absolute.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
    }
    let mut file = tokio::fs::File::create(&absolute).await.map_err(io_error)?;
    let mut written: usize = 0;

    let result: AppResult<()> = async {
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            written += chunk.len();
            if written > config.max_upload_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds the {} byte limit",
                    config.max_upload_bytes
                )));
            }
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)?;
        if written == 0 {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }
        Ok(())
    }
    .await;

    drop(file);
    if let Err(e) = result {
        discard(&absolute).await;
        return Err(e);
    }

    Ok((relative.to_string_lossy().into_owned(), written as i64))
}

async fn discard(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

fn io_error(err: std::io::Error) -> AppError {
    AppError::InternalError(format!("Upload storage error: {err}"))
}
