//! Repository for the `assets` table.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::{ASSET_TYPE_OTHER, TASK_STATUS_WAITING};
use reeltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};
use crate::repositories::entity_repo::{CascadeSummary, EntityRepo};

const COLUMNS: &str =
    "id, sequence_id, code, name, description, status, asset_type, created_at, updated_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset under a sequence. `asset_type` defaults to `other`.
    pub async fn create(
        pool: &PgPool,
        sequence_id: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (sequence_id, code, name, description, status, asset_type)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), COALESCE($7, $8))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(sequence_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(TASK_STATUS_WAITING)
            .bind(&input.asset_type)
            .bind(ASSET_TYPE_OTHER)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_sequence(
        pool: &PgPool,
        sequence_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE sequence_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY asset_type, code, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Asset>(&query)
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
            "SELECT COUNT(*) FROM assets
             WHERE sequence_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(sequence_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                asset_type = COALESCE($6, asset_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.asset_type)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CascadeSummary>, sqlx::Error> {
        EntityRepo::delete_subtree(pool, EntityKind::Asset, id).await
    }
}
