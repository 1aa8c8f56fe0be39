//! Repository for the `versions` table.
//!
//! Every operation that can change which version of a parent is `latest`
//! first takes a transaction-scoped advisory lock keyed on the parent
//! `(entity_type, entity_id)`. Concurrent creates, promotions and deletes
//! for the same parent therefore run one after another, and the
//! `uq_versions_latest` partial index never sees two latest rows.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::VERSION_STATUS_PENDING_REVIEW;
use reeltrack_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::version::{CreateVersion, UpdateVersion, Version, VersionFilter};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};
use crate::repositories::playlist_repo::compact_positions;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, entity_type, entity_id, code, name, description, status, \
    version_number, latest, file_path, file_size_bytes, created_by, created_at, updated_at";

/// Filter clause shared by `list` and `count`. Binds `$1..$4`.
const FILTER: &str = "($1::text IS NULL OR entity_type = $1)
    AND ($2::bigint IS NULL OR entity_id = $2)
    AND ($3::text IS NULL OR status = $3)
    AND (NOT $4 OR latest)";

/// Provides CRUD and latest-flag operations for versions.
pub struct VersionRepo;

impl VersionRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new version under `(kind, input.entity_id)`.
    ///
    /// Assigns the next `version_number` for the parent. If `latest` is
    /// `None` or `Some(true)` the new row becomes the parent's latest and
    /// the previous latest is cleared in the same transaction.
    ///
    /// Returns `None` if the parent entity does not exist.
    pub async fn create(
        pool: &PgPool,
        kind: EntityKind,
        created_by: Option<DbId>,
        input: &CreateVersion,
    ) -> Result<Option<Version>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !EntityRepo::lock_for_share(&mut tx, kind, input.entity_id).await? {
            return Ok(None);
        }
        lock_parent(&mut tx, kind.as_str(), input.entity_id).await?;

        let latest = input.latest.unwrap_or(true);
        if latest {
            clear_latest(&mut tx, kind.as_str(), input.entity_id, None).await?;
        }

        let query = format!(
            "INSERT INTO versions
                (entity_type, entity_id, code, name, description, status,
                 version_number, latest, created_by)
             VALUES (
                $1, $2, $3, $4, $5, COALESCE($6, $7),
                (SELECT COALESCE(MAX(version_number), 0) + 1 FROM versions
                 WHERE entity_type = $1 AND entity_id = $2),
                $8, $9
             )
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, Version>(&query)
            .bind(kind.as_str())
            .bind(input.entity_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(VERSION_STATUS_PENDING_REVIEW)
            .bind(latest)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(version))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Version>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM versions WHERE id = $1");
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List versions matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &VersionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM versions
             WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(&filter.entity_type)
            .bind(filter.entity_id)
            .bind(&filter.status)
            .bind(filter.latest_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &VersionFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM versions WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.entity_type)
            .bind(filter.entity_id)
            .bind(&filter.status)
            .bind(filter.latest_only)
            .fetch_one(pool)
            .await
    }

    /// Update a version. Only non-`None` fields in `input` are applied.
    ///
    /// `latest: Some(true)` promotes the row and clears its siblings in the
    /// same transaction; `Some(false)` clears the flag on this row only.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVersion,
    ) -> Result<Option<Version>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((entity_type, entity_id)) = parent_of(&mut tx, id).await? else {
            return Ok(None);
        };

        if input.latest == Some(true) {
            lock_parent(&mut tx, &entity_type, entity_id).await?;
            clear_latest(&mut tx, &entity_type, entity_id, Some(id)).await?;
        }

        let query = format!(
            "UPDATE versions SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                latest = COALESCE($6, latest)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.latest)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// Delete a version and the notes linked to it.
    ///
    /// Playlists that contained the version are compacted. If the version
    /// was its parent's latest, the highest remaining `version_number`
    /// becomes latest. Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((entity_type, entity_id)) = parent_of(&mut tx, id).await? else {
            return Ok(None);
        };
        lock_parent(&mut tx, &entity_type, entity_id).await?;

        // Waits out in-flight note inserts, which hold a share lock on the row.
        if !lock_for_delete(&mut tx, id).await? {
            return Ok(None);
        }

        let notes = sqlx::query("DELETE FROM notes WHERE link_type = 'version' AND link_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let touched: Vec<DbId> =
            sqlx::query_scalar("SELECT playlist_id FROM playlist_versions WHERE version_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let was_latest: Option<bool> =
            sqlx::query_scalar("DELETE FROM versions WHERE id = $1 RETURNING latest")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(was_latest) = was_latest else {
            return Ok(None);
        };

        compact_positions(&mut tx, &touched).await?;

        if was_latest {
            sqlx::query(
                "UPDATE versions SET latest = true
                 WHERE id = (
                    SELECT id FROM versions
                    WHERE entity_type = $1 AND entity_id = $2
                    ORDER BY version_number DESC
                    LIMIT 1
                 )",
            )
            .bind(&entity_type)
            .bind(entity_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(CascadeSummary {
            versions: 1,
            notes,
            ..CascadeSummary::default()
        }))
    }

    // ── Latest-flag operations ───────────────────────────────────────

    /// Make a version its parent's latest, clearing the flag on every
    /// sibling in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_latest(pool: &PgPool, id: DbId) -> Result<Option<Version>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((entity_type, entity_id)) = parent_of(&mut tx, id).await? else {
            return Ok(None);
        };
        lock_parent(&mut tx, &entity_type, entity_id).await?;
        clear_latest(&mut tx, &entity_type, entity_id, Some(id)).await?;

        let query = format!("UPDATE versions SET latest = true WHERE id = $1 RETURNING {COLUMNS}");
        let version = sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// The latest version of a parent entity, if any.
    pub async fn find_latest(
        pool: &PgPool,
        kind: EntityKind,
        entity_id: DbId,
    ) -> Result<Option<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM versions
             WHERE entity_type = $1 AND entity_id = $2 AND latest"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(kind.as_str())
            .bind(entity_id)
            .fetch_optional(pool)
            .await
    }

    /// Record an uploaded media file on a version.
    ///
    /// The previous path is read under a row lock in the same transaction,
    /// so concurrent uploads each learn exactly the file they replaced.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn attach_file(
        pool: &PgPool,
        id: DbId,
        file_path: &str,
        file_size_bytes: i64,
    ) -> Result<Option<AttachedFile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT file_path FROM versions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE versions SET file_path = $2, file_size_bytes = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(file_path)
            .bind(file_size_bytes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(AttachedFile {
            version,
            replaced: previous.filter(|p| p != file_path),
        }))
    }
}

/// Result of [`VersionRepo::attach_file`].
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub version: Version,
    /// Path of the file this upload superseded, if any.
    pub replaced: Option<String>,
}

/// Serialise latest-flag changes for one parent until the transaction ends.
async fn lock_parent(
    conn: &mut PgConnection,
    entity_type: &str,
    entity_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended('versions:' || $1 || ':' || $2::text, 0))")
        .bind(entity_type)
        .bind(entity_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Clear `latest` on every version of a parent except `keep`.
async fn clear_latest(
    conn: &mut PgConnection,
    entity_type: &str,
    entity_id: DbId,
    keep: Option<DbId>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE versions SET latest = false
         WHERE entity_type = $1 AND entity_id = $2 AND latest
           AND ($3::bigint IS NULL OR id <> $3)",
    )
    .bind(entity_type)
    .bind(entity_id)
    .bind(keep)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Row-lock a version ahead of deleting it. Returns `false` if it is gone.
async fn lock_for_delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_scalar::<_, DbId>("SELECT id FROM versions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn parent_of(conn: &mut PgConnection, id: DbId) -> Result<Option<(String, DbId)>, sqlx::Error> {
    sqlx::query_as::<_, (String, DbId)>("SELECT entity_type, entity_id FROM versions WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}
