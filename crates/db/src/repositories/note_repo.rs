//! Repository for the `notes` table.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::status::NOTE_STATUS_OPEN;
use reeltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note, NoteFilter, UpdateNote};
use crate::repositories::entity_repo::EntityRepo;

const COLUMNS: &str =
    "id, link_type, link_id, subject, content, status, author_id, created_at, updated_at";

/// Filter clause shared by `list` and `count`. Binds `$1..$4`.
const FILTER: &str = "($1::text IS NULL OR link_type = $1)
    AND ($2::bigint IS NULL OR link_id = $2)
    AND ($3::bigint IS NULL OR author_id = $3)
    AND ($4::text IS NULL OR status = $4)";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a note linked to `(kind, input.link_id)`.
    ///
    /// The linked row is share-locked for the duration of the insert so a
    /// concurrent cascade delete cannot leave the note orphaned. Returns
    /// `None` if the linked entity does not exist.
    pub async fn create(
        pool: &PgPool,
        kind: EntityKind,
        author_id: Option<DbId>,
        input: &CreateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !EntityRepo::lock_for_share(&mut tx, kind, input.link_id).await? {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO notes (link_type, link_id, subject, content, status, author_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), $7)
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(kind.as_str())
            .bind(input.link_id)
            .bind(&input.subject)
            .bind(&input.content)
            .bind(&input.status)
            .bind(NOTE_STATUS_OPEN)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(note))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notes matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &NoteFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&filter.link_type)
            .bind(filter.link_id)
            .bind(filter.author_id)
            .bind(&filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &NoteFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM notes WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.link_type)
            .bind(filter.link_id)
            .bind(filter.author_id)
            .bind(&filter.status)
            .fetch_one(pool)
            .await
    }

    /// Update a note. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                subject = COALESCE($2, subject),
                content = COALESCE($3, content),
                status = COALESCE($4, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.subject)
            .bind(&input.content)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
