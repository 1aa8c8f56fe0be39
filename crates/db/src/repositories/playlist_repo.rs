//! Repository for the `playlists` and `playlist_versions` tables.
//!
//! Entry positions are 0-based and kept contiguous: every mutation that
//! removes an entry renumbers the rest.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::playlist::{CreatePlaylist, Playlist, PlaylistEntry, UpdatePlaylist};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, code, name, description, created_by, created_at, updated_at";

/// Version columns prefixed for the entry join.
const ENTRY_COLUMNS: &str = "pv.position, v.id, v.entity_type, v.entity_id, v.code, v.name, \
    v.description, v.status, v.version_number, v.latest, v.file_path, v.file_size_bytes, \
    v.created_by, v.created_at, v.updated_at";

/// Provides CRUD and ordering operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a new playlist under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        created_by: Option<DbId>,
        input: &CreatePlaylist,
    ) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (project_id, code, name, description, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List playlists of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Playlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlists
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Update a playlist. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylist,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a playlist, its entries and the notes linked to it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        EntityRepo::delete_subtree(pool, EntityKind::Playlist, id).await
    }

    // ── Entries ──────────────────────────────────────────────────────

    /// Versions in a playlist ordered by position.
    pub async fn list_versions(
        pool: &PgPool,
        playlist_id: DbId,
    ) -> Result<Vec<PlaylistEntry>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        entries(&mut conn, playlist_id).await
    }

    /// Add a version to a playlist.
    ///
    /// `position: None` appends. A position past the end is clamped to the
    /// end; otherwise the entries at and after `position` shift down by one.
    /// Returns the resulting entries, or `None` if the playlist does not exist.
    /// Adding a version twice fails with the `uq_playlist_versions_pair`
    /// unique violation.
    pub async fn add_version(
        pool: &PgPool,
        playlist_id: DbId,
        version_id: DbId,
        position: Option<i32>,
    ) -> Result<Option<Vec<PlaylistEntry>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_playlist(&mut tx, playlist_id).await? {
            return Ok(None);
        }

        let len: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM playlist_versions WHERE playlist_id = $1")
                .bind(playlist_id)
                .fetch_one(&mut *tx)
                .await?;
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        let position = position.map_or(len, |p| p.clamp(0, len));

        if position < len {
            sqlx::query(
                "UPDATE playlist_versions SET position = position + 1
                 WHERE playlist_id = $1 AND position >= $2",
            )
            .bind(playlist_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO playlist_versions (playlist_id, version_id, position)
             VALUES ($1, $2, $3)",
        )
        .bind(playlist_id)
        .bind(version_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        let result = entries(&mut tx, playlist_id).await?;
        tx.commit().await?;
        Ok(Some(result))
    }

    /// Remove a version from a playlist and close the gap.
    ///
    /// Returns `false` if the version was not in the playlist.
    pub async fn remove_version(
        pool: &PgPool,
        playlist_id: DbId,
        version_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_playlist(&mut tx, playlist_id).await? {
            return Ok(false);
        }

        let removed = sqlx::query(
            "DELETE FROM playlist_versions WHERE playlist_id = $1 AND version_id = $2",
        )
        .bind(playlist_id)
        .bind(version_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if removed {
            compact_positions(&mut tx, &[playlist_id]).await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    /// Rewrite positions to follow `version_ids`.
    ///
    /// Returns `None` if the playlist does not exist or `version_ids` is not
    /// a permutation of its current members.
    pub async fn reorder(
        pool: &PgPool,
        playlist_id: DbId,
        version_ids: &[DbId],
    ) -> Result<Option<Vec<PlaylistEntry>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_playlist(&mut tx, playlist_id).await? {
            return Ok(None);
        }

        let mut current: Vec<DbId> = sqlx::query_scalar(
            "SELECT version_id FROM playlist_versions WHERE playlist_id = $1",
        )
        .bind(playlist_id)
        .fetch_all(&mut *tx)
        .await?;
        current.sort_unstable();

        let mut requested = version_ids.to_vec();
        requested.sort_unstable();
        if current != requested {
            return Ok(None);
        }

        sqlx::query(
            "UPDATE playlist_versions pv SET position = (o.ord - 1)::int
             FROM UNNEST($2::bigint[]) WITH ORDINALITY AS o(version_id, ord)
             WHERE pv.playlist_id = $1 AND pv.version_id = o.version_id",
        )
        .bind(playlist_id)
        .bind(version_ids)
        .execute(&mut *tx)
        .await?;

        let result = entries(&mut tx, playlist_id).await?;
        tx.commit().await?;
        Ok(Some(result))
    }
}

/// Renumber the entries of each playlist to `0..n`, keeping their order.
pub(crate) async fn compact_positions(
    conn: &mut PgConnection,
    playlist_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if playlist_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "UPDATE playlist_versions pv SET position = r.rn - 1
         FROM (
            SELECT id, (ROW_NUMBER() OVER (PARTITION BY playlist_id ORDER BY position, id))::int AS rn
            FROM playlist_versions
            WHERE playlist_id = ANY($1)
         ) r
         WHERE pv.id = r.id AND pv.position <> r.rn - 1",
    )
    .bind(playlist_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Serialise membership changes per playlist.
async fn lock_playlist(conn: &mut PgConnection, playlist_id: DbId) -> Result<bool, sqlx::Error> {
    let row: Option<DbId> = sqlx::query_scalar("SELECT id FROM playlists WHERE id = $1 FOR UPDATE")
        .bind(playlist_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn entries(
    conn: &mut PgConnection,
    playlist_id: DbId,
) -> Result<Vec<PlaylistEntry>, sqlx::Error> {
    let query = format!(
        "SELECT {ENTRY_COLUMNS}
         FROM playlist_versions pv
         JOIN versions v ON v.id = pv.version_id
         WHERE pv.playlist_id = $1
         ORDER BY pv.position, pv.id"
    );
    sqlx::query_as::<_, PlaylistEntry>(&query)
        .bind(playlist_id)
        .fetch_all(&mut *conn)
        .await
}
