//! Cross-table operations over the entity hierarchy.
//!
//! Versions and notes reference their parent through `(type, id)` pairs and
//! therefore cannot rely on `ON DELETE CASCADE`. Every hierarchy delete goes
//! through [`EntityRepo::delete_subtree`], which removes the polymorphic
//! dependents of the whole subtree in the same transaction as the root row.

use reeltrack_core::entity::EntityKind;
use reeltrack_core::types::DbId;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::repositories::playlist_repo::compact_positions;
use crate::repositories::version_repo::VersionRepo;

/// Rows removed alongside the root of a delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub episodes: u64,
    pub sequences: u64,
    pub shots: u64,
    pub assets: u64,
    pub playlists: u64,
    pub versions: u64,
    pub notes: u64,
}

/// Ids of every structural node below (and including) a delete root.
#[derive(Debug, Default)]
struct Subtree {
    projects: Vec<DbId>,
    episodes: Vec<DbId>,
    sequences: Vec<DbId>,
    shots: Vec<DbId>,
    assets: Vec<DbId>,
    playlists: Vec<DbId>,
}

/// Existence checks, ownership lookups and cascade deletes for any kind.
pub struct EntityRepo;

impl EntityRepo {
    /// Whether a row of `kind` with `id` exists.
    pub async fn exists(pool: &PgPool, kind: EntityKind, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
        sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Take a share lock on a row so a concurrent cascade delete cannot
    /// remove it before the caller's transaction commits.
    ///
    /// Returns `false` if the row does not exist.
    pub(crate) async fn lock_for_share(
        conn: &mut PgConnection,
        kind: EntityKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT id FROM {} WHERE id = $1 FOR SHARE", kind.table());
        let row = sqlx::query_scalar::<_, DbId>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.is_some())
    }

    /// Resolve the project an entity belongs to.
    ///
    /// Versions resolve through their parent. Returns `None` if the entity
    /// (or, for a version, its parent) does not exist.
    pub async fn project_id_of(
        pool: &PgPool,
        kind: EntityKind,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let (kind, id) = match kind {
            EntityKind::Version => {
                let parent = sqlx::query_as::<_, (String, DbId)>(
                    "SELECT entity_type, entity_id FROM versions WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(pool)
                .await?;
                match parent.and_then(|(t, id)| t.parse::<EntityKind>().ok().map(|k| (k, id))) {
                    Some(parent) => parent,
                    None => return Ok(None),
                }
            }
            other => (other, id),
        };

        let query = match kind {
            EntityKind::Project => "SELECT id FROM projects WHERE id = $1",
            EntityKind::Episode => "SELECT project_id FROM episodes WHERE id = $1",
            EntityKind::Sequence => {
                "SELECT e.project_id FROM sequences s
                 JOIN episodes e ON e.id = s.episode_id
                 WHERE s.id = $1"
            }
            EntityKind::Shot => {
                "SELECT e.project_id FROM shots sh
                 JOIN sequences s ON s.id = sh.sequence_id
                 JOIN episodes e ON e.id = s.episode_id
                 WHERE sh.id = $1"
            }
            EntityKind::Asset => {
                "SELECT e.project_id FROM assets a
                 JOIN sequences s ON s.id = a.sequence_id
                 JOIN episodes e ON e.id = s.episode_id
                 WHERE a.id = $1"
            }
            EntityKind::Playlist => "SELECT project_id FROM playlists WHERE id = $1",
            // Versions never parent other versions.
            EntityKind::Version => return Ok(None),
        };
        sqlx::query_scalar::<_, DbId>(query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entity together with everything below it.
    ///
    /// Runs in one transaction:
    /// 1. lock the root and every structural descendant `FOR UPDATE`,
    /// 2. collect the versions attached to any node of the subtree,
    /// 3. delete notes linked to the subtree, its versions and playlists,
    /// 4. delete those versions and compact the playlists they sat in,
    /// 5. delete the root row; foreign keys remove structural children,
    ///    playlists and playlist entries.
    ///
    /// Returns `None` if the root does not exist.
    pub async fn delete_subtree(
        pool: &PgPool,
        kind: EntityKind,
        id: DbId,
    ) -> Result<Option<CascadeSummary>, sqlx::Error> {
        if kind == EntityKind::Version {
            return VersionRepo::delete(pool, id).await;
        }

        let mut tx = pool.begin().await?;

        let Some(subtree) = collect_subtree(&mut *tx, kind, id).await? else {
            return Ok(None);
        };

        let version_ids = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM versions WHERE
                (entity_type = 'project' AND entity_id = ANY($1))
             OR (entity_type = 'episode' AND entity_id = ANY($2))
             OR (entity_type = 'sequence' AND entity_id = ANY($3))
             OR (entity_type = 'shot' AND entity_id = ANY($4))
             OR (entity_type = 'asset' AND entity_id = ANY($5))
             FOR UPDATE",
        )
        .bind(&subtree.projects)
        .bind(&subtree.episodes)
        .bind(&subtree.sequences)
        .bind(&subtree.shots)
        .bind(&subtree.assets)
        .fetch_all(&mut *tx)
        .await?;

        let notes = sqlx::query(
            "DELETE FROM notes WHERE
                (link_type = 'project' AND link_id = ANY($1))
             OR (link_type = 'episode' AND link_id = ANY($2))
             OR (link_type = 'sequence' AND link_id = ANY($3))
             OR (link_type = 'shot' AND link_id = ANY($4))
             OR (link_type = 'asset' AND link_id = ANY($5))
             OR (link_type = 'version' AND link_id = ANY($6))
             OR (link_type = 'playlist' AND link_id = ANY($7))",
        )
        .bind(&subtree.projects)
        .bind(&subtree.episodes)
        .bind(&subtree.sequences)
        .bind(&subtree.shots)
        .bind(&subtree.assets)
        .bind(&version_ids)
        .bind(&subtree.playlists)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let mut versions = 0;
        if !version_ids.is_empty() {
            let touched = sqlx::query_scalar::<_, DbId>(
                "SELECT DISTINCT playlist_id FROM playlist_versions
                 WHERE version_id = ANY($1) AND NOT (playlist_id = ANY($2))",
            )
            .bind(&version_ids)
            .bind(&subtree.playlists)
            .fetch_all(&mut *tx)
            .await?;

            versions = sqlx::query("DELETE FROM versions WHERE id = ANY($1)")
                .bind(&version_ids)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            compact_positions(&mut *tx, &touched).await?;
        }

        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        sqlx::query(&query).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;

        let summary = subtree.summary(kind, versions, notes);
        tracing::debug!(entity = %kind, id, ?summary, "Deleted subtree");
        Ok(Some(summary))
    }
}

impl Subtree {
    fn summary(&self, root: EntityKind, versions: u64, notes: u64) -> CascadeSummary {
        let below = |ids: &[DbId], kind: EntityKind| {
            let n = ids.len() as u64;
            if kind == root {
                n.saturating_sub(1)
            } else {
                n
            }
        };
        CascadeSummary {
            episodes: below(&self.episodes, EntityKind::Episode),
            sequences: below(&self.sequences, EntityKind::Sequence),
            shots: below(&self.shots, EntityKind::Shot),
            assets: below(&self.assets, EntityKind::Asset),
            playlists: below(&self.playlists, EntityKind::Playlist),
            versions,
            notes,
        }
    }
}

/// Lock the root row and walk down the hierarchy, locking every child.
async fn collect_subtree(
    conn: &mut PgConnection,
    kind: EntityKind,
    id: DbId,
) -> Result<Option<Subtree>, sqlx::Error> {
    let query = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", kind.table());
    let root = sqlx::query_scalar::<_, DbId>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    if root.is_none() {
        return Ok(None);
    }

    let mut subtree = Subtree::default();
    match kind {
        EntityKind::Project => {
            subtree.projects.push(id);
            subtree.episodes = child_ids(conn, "episodes", "project_id", &subtree.projects).await?;
            subtree.playlists =
                child_ids(conn, "playlists", "project_id", &subtree.projects).await?;
        }
        EntityKind::Episode => subtree.episodes.push(id),
        EntityKind::Sequence => subtree.sequences.push(id),
        EntityKind::Shot => subtree.shots.push(id),
        EntityKind::Asset => subtree.assets.push(id),
        EntityKind::Playlist => subtree.playlists.push(id),
        EntityKind::Version => {}
    }

    let sequences = child_ids(conn, "sequences", "episode_id", &subtree.episodes).await?;
    subtree.sequences.extend(sequences);
    let shots = child_ids(conn, "shots", "sequence_id", &subtree.sequences).await?;
    subtree.shots.extend(shots);
    let assets = child_ids(conn, "assets", "sequence_id", &subtree.sequences).await?;
    subtree.assets.extend(assets);

    Ok(Some(subtree))
}

async fn child_ids(
    conn: &mut PgConnection,
    table: &str,
    parent_column: &str,
    parents: &[DbId],
) -> Result<Vec<DbId>, sqlx::Error> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }
    let query = format!(
        "SELECT id FROM {table} WHERE {parent_column} = ANY($1) ORDER BY id FOR UPDATE"
    );
    sqlx::query_scalar::<_, DbId>(&query)
        .bind(parents)
        .fetch_all(&mut *conn)
        .await
}
