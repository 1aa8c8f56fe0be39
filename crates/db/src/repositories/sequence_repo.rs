//! Repository for the `sequences` table.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::TASK_STATUS_WAITING;
use reeltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::sequence::{CreateSequence, Sequence, UpdateSequence};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};

const COLUMNS: &str = "id, episode_id, code, name, description, status, created_at, updated_at";

/// Provides CRUD operations for sequences.
pub struct SequenceRepo;

impl SequenceRepo {
    pub async fn create(
        pool: &PgPool,
        episode_id: DbId,
        input: &CreateSequence,
    ) -> Result<Sequence, sqlx::Error> {
        let query = format!(
            "INSERT INTO sequences (episode_id, code, name, description, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(episode_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(TASK_STATUS_WAITING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequences WHERE id = $1");
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_episode(
        pool: &PgPool,
        episode_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Sequence>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequences
             WHERE episode_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY code, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(episode_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_episode(
        pool: &PgPool,
        episode_id: DbId,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sequences
             WHERE episode_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(episode_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSequence,
    ) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!(
            "UPDATE sequences SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a sequence with its shots, assets and their versions and notes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        EntityRepo::delete_subtree(pool, EntityKind::Sequence, id).await
    }
}
