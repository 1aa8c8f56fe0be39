//! Repository for the `shots` table.
//!
//! `frame_count` is a generated column; it is read back but never written.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::TASK_STATUS_WAITING;
use reeltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::shot::{CreateShot, Shot, UpdateShot};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};

const COLUMNS: &str = "id, sequence_id, code, name, description, status, \
    cut_in, cut_out, frame_count, created_at, updated_at";

/// Provides CRUD operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Insert a new shot under a sequence.
    pub async fn create(
        pool: &PgPool,
        sequence_id: DbId,
        input: &CreateShot,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots (sequence_id, code, name, description, status, cut_in, cut_out)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(sequence_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(TASK_STATUS_WAITING)
            .bind(input.cut_in)
            .bind(input.cut_out)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Shots of a sequence in cut order, then by code.
    pub async fn list_by_sequence(
        pool: &PgPool,
        sequence_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shots
             WHERE sequence_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY cut_in NULLS LAST, code, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(sequence_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_sequence(
        pool: &PgPool,
        sequence_id: DbId,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM shots
             WHERE sequence_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(sequence_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Update a shot. Only non-`None` fields in `input` are applied.
    ///
    /// A resulting `cut_out < cut_in` violates `ck_shots_cut_range`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                cut_in = COALESCE($6, cut_in),
                cut_out = COALESCE($7, cut_out)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.cut_in)
            .bind(input.cut_out)
            .fetch_optional(pool)
            .await
    }

    /// Delete a shot together with its versions and notes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        EntityRepo::delete_subtree(pool, EntityKind::Shot, id).await
    }
}
