//! Repository for the `episodes` table.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::TASK_STATUS_WAITING;
use reeltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::episode::{CreateEpisode, Episode, UpdateEpisode};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};

const COLUMNS: &str = "id, project_id, code, name, description, status, created_at, updated_at";

/// Provides CRUD operations for episodes.
pub struct EpisodeRepo;

impl EpisodeRepo {
    /// Insert a new episode under a project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateEpisode,
    ) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO episodes (project_id, code, name, description, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(TASK_STATUS_WAITING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM episodes WHERE id = $1");
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Episodes of a project ordered by code.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes
             WHERE project_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY code, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(project_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_project(
        pool: &PgPool,
        project_id: DbId,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM episodes
             WHERE project_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Update an episode. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEpisode,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "UPDATE episodes SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an episode and everything below it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        EntityRepo::delete_subtree(pool, EntityKind::Episode, id).await
    }
}
