//! Integration tests for hierarchical cascade deletes.
//!
//! Builds a full tree with versions, notes and playlist entries at every
//! level, deletes nodes at different depths and checks that no row
//! referencing a removed entity survives, polymorphic links included.

use futures::future::join_all;
use reeltrack_core::entity::EntityKind;
use reeltrack_db::models::asset::CreateAsset;
use reeltrack_db::models::episode::CreateEpisode;
use reeltrack_db::models::note::CreateNote;
use reeltrack_db::models::playlist::CreatePlaylist;
use reeltrack_db::models::project::CreateProject;
use reeltrack_db::models::sequence::CreateSequence;
use reeltrack_db::models::shot::CreateShot;
use reeltrack_db::models::version::CreateVersion;
use reeltrack_db::repositories::{
    AssetRepo, EntityRepo, EpisodeRepo, NoteRepo, PlaylistRepo, ProjectRepo, SequenceRepo,
    ShotRepo, VersionRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Tree {
    project: i64,
    episode: i64,
    sequence: i64,
    shot: i64,
    asset: i64,
    shot_version: i64,
    asset_version: i64,
    playlist: i64,
}

async fn version(pool: &PgPool, kind: EntityKind, entity_id: i64, code: &str) -> i64 {
    VersionRepo::create(
        pool,
        kind,
        None,
        &CreateVersion {
            entity_type: kind.as_str().to_string(),
            entity_id,
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            status: None,
            latest: None,
        },
    )
    .await
    .unwrap()
    .unwrap()
    .id
}

async fn note(pool: &PgPool, kind: EntityKind, link_id: i64) {
    NoteRepo::create(
        pool,
        kind,
        None,
        &CreateNote {
            link_type: kind.as_str().to_string(),
            link_id,
            subject: format!("On {kind}"),
            content: "Please tighten the timing.".to_string(),
            status: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
}

/// One node per level, a version on every versionable node, a note on
/// every node, and a playlist holding the shot and asset versions.
async fn build_tree(pool: &PgPool, suffix: &str) -> Tree {
    let project = ProjectRepo::create(
        pool,
        None,
        &CreateProject {
            code: format!("P_{suffix}"),
            name: "Project".to_string(),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap()
    .id;
    let episode = EpisodeRepo::create(
        pool,
        project,
        &CreateEpisode {
            code: format!("EP_{suffix}"),
            name: "Episode".to_string(),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap()
    .id;
    let sequence = SequenceRepo::create(
        pool,
        episode,
        &CreateSequence {
            code: format!("SQ_{suffix}"),
            name: "Sequence".to_string(),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap()
    .id;
    let shot = ShotRepo::create(
        pool,
        sequence,
        &CreateShot {
            code: format!("SH_{suffix}"),
            name: "Shot".to_string(),
            description: None,
            status: None,
            cut_in: Some(1001),
            cut_out: Some(1048),
        },
    )
    .await
    .unwrap()
    .id;
    let asset = AssetRepo::create(
        pool,
        sequence,
        &CreateAsset {
            code: format!("AS_{suffix}"),
            name: "Asset".to_string(),
            description: None,
            status: None,
            asset_type: Some("character".to_string()),
        },
    )
    .await
    .unwrap()
    .id;

    version(pool, EntityKind::Project, project, &format!("PV_{suffix}")).await;
    version(pool, EntityKind::Episode, episode, &format!("EV_{suffix}")).await;
    version(pool, EntityKind::Sequence, sequence, &format!("QV_{suffix}")).await;
    let shot_version = version(pool, EntityKind::Shot, shot, &format!("SV_{suffix}")).await;
    let asset_version = version(pool, EntityKind::Asset, asset, &format!("AV_{suffix}")).await;

    let playlist = PlaylistRepo::create(
        pool,
        project,
        None,
        &CreatePlaylist {
            code: format!("PL_{suffix}"),
            name: "Dailies".to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id;
    PlaylistRepo::add_version(pool, playlist, shot_version, None).await.unwrap().unwrap();
    PlaylistRepo::add_version(pool, playlist, asset_version, None).await.unwrap().unwrap();

    for (kind, id) in [
        (EntityKind::Project, project),
        (EntityKind::Episode, episode),
        (EntityKind::Sequence, sequence),
        (EntityKind::Shot, shot),
        (EntityKind::Asset, asset),
        (EntityKind::Version, shot_version),
        (EntityKind::Playlist, playlist),
    ] {
        note(pool, kind, id).await;
    }

    Tree {
        project,
        episode,
        sequence,
        shot,
        asset,
        shot_version,
        asset_version,
        playlist,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Versions and notes whose polymorphic parent no longer exists.
async fn orphans(pool: &PgPool) -> (i64, i64) {
    let versions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM versions v WHERE NOT CASE v.entity_type
            WHEN 'project' THEN EXISTS(SELECT 1 FROM projects WHERE id = v.entity_id)
            WHEN 'episode' THEN EXISTS(SELECT 1 FROM episodes WHERE id = v.entity_id)
            WHEN 'sequence' THEN EXISTS(SELECT 1 FROM sequences WHERE id = v.entity_id)
            WHEN 'shot' THEN EXISTS(SELECT 1 FROM shots WHERE id = v.entity_id)
            WHEN 'asset' THEN EXISTS(SELECT 1 FROM assets WHERE id = v.entity_id)
         END",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let notes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notes n WHERE NOT CASE n.link_type
            WHEN 'project' THEN EXISTS(SELECT 1 FROM projects WHERE id = n.link_id)
            WHEN 'episode' THEN EXISTS(SELECT 1 FROM episodes WHERE id = n.link_id)
            WHEN 'sequence' THEN EXISTS(SELECT 1 FROM sequences WHERE id = n.link_id)
            WHEN 'shot' THEN EXISTS(SELECT 1 FROM shots WHERE id = n.link_id)
            WHEN 'asset' THEN EXISTS(SELECT 1 FROM assets WHERE id = n.link_id)
            WHEN 'version' THEN EXISTS(SELECT 1 FROM versions WHERE id = n.link_id)
            WHEN 'playlist' THEN EXISTS(SELECT 1 FROM playlists WHERE id = n.link_id)
         END",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    (versions, notes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_delete_leaves_nothing_behind(pool: PgPool) {
    let tree = build_tree(&pool, "full").await;

    let summary = ProjectRepo::delete(&pool, tree.project).await.unwrap().unwrap();
    assert_eq!(summary.episodes, 1);
    assert_eq!(summary.sequences, 1);
    assert_eq!(summary.shots, 1);
    assert_eq!(summary.assets, 1);
    assert_eq!(summary.playlists, 1);
    assert_eq!(summary.versions, 5);
    assert_eq!(summary.notes, 7);

    for table in [
        "projects",
        "episodes",
        "sequences",
        "shots",
        "assets",
        "versions",
        "playlists",
        "playlist_versions",
        "notes",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{table} should be empty");
    }
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_delete_spares_other_projects(pool: PgPool) {
    let doomed = build_tree(&pool, "doomed").await;
    let kept = build_tree(&pool, "kept").await;

    ProjectRepo::delete(&pool, doomed.project).await.unwrap().unwrap();

    assert_eq!(count(&pool, "projects").await, 1);
    assert_eq!(count(&pool, "versions").await, 5);
    assert_eq!(count(&pool, "notes").await, 7);
    assert_eq!(count(&pool, "playlist_versions").await, 2);
    assert!(EntityRepo::exists(&pool, EntityKind::Shot, kept.shot).await.unwrap());
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_delete_compacts_playlists(pool: PgPool) {
    let tree = build_tree(&pool, "shot").await;

    let summary = ShotRepo::delete(&pool, tree.shot).await.unwrap().unwrap();
    assert_eq!(summary.shots, 0, "the root itself is not counted");
    assert_eq!(summary.versions, 1);
    assert_eq!(summary.notes, 2, "note on the shot and on its version");

    assert!(!EntityRepo::exists(&pool, EntityKind::Version, tree.shot_version).await.unwrap());
    assert!(EntityRepo::exists(&pool, EntityKind::Asset, tree.asset).await.unwrap());

    let entries = PlaylistRepo::list_versions(&pool, tree.playlist).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].version.id, tree.asset_version);
    assert_eq!(entries[0].position, 0, "remaining entry moves up");
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episode_and_sequence_delete(pool: PgPool) {
    let tree = build_tree(&pool, "mid").await;

    let summary = SequenceRepo::delete(&pool, tree.sequence).await.unwrap().unwrap();
    assert_eq!((summary.shots, summary.assets, summary.versions), (1, 1, 3));
    assert!(EntityRepo::exists(&pool, EntityKind::Episode, tree.episode).await.unwrap());
    assert_eq!(count(&pool, "playlist_versions").await, 0);

    let summary = EpisodeRepo::delete(&pool, tree.episode).await.unwrap().unwrap();
    assert_eq!(summary.versions, 1);
    assert!(EntityRepo::exists(&pool, EntityKind::Project, tree.project).await.unwrap());
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_playlist_delete_keeps_versions(pool: PgPool) {
    let tree = build_tree(&pool, "pl").await;

    let summary = PlaylistRepo::delete(&pool, tree.playlist).await.unwrap().unwrap();
    assert_eq!(summary.notes, 1);
    assert_eq!(summary.versions, 0);
    assert_eq!(count(&pool, "playlist_versions").await, 0);
    assert_eq!(count(&pool, "versions").await, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_returns_none(pool: PgPool) {
    assert!(ProjectRepo::delete(&pool, 31_337).await.unwrap().is_none());
    assert!(ShotRepo::delete(&pool, 31_337).await.unwrap().is_none());
    assert!(VersionRepo::delete(&pool, 31_337).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_id_of_resolves_through_hierarchy(pool: PgPool) {
    let tree = build_tree(&pool, "owner").await;

    for (kind, id) in [
        (EntityKind::Project, tree.project),
        (EntityKind::Sequence, tree.sequence),
        (EntityKind::Asset, tree.asset),
        (EntityKind::Version, tree.shot_version),
        (EntityKind::Playlist, tree.playlist),
    ] {
        let owner = EntityRepo::project_id_of(&pool, kind, id).await.unwrap();
        assert_eq!(owner, Some(tree.project), "{kind} {id}");
    }
    assert_eq!(
        EntityRepo::project_id_of(&pool, EntityKind::Shot, 8_888).await.unwrap(),
        None
    );
}

/// Versions created while their project is being deleted either land
/// before the delete (and are removed with it) or fail to find the parent.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_racing_version_creates_leaves_no_orphans(pool: PgPool) {
    let tree = build_tree(&pool, "race").await;

    let creates = (0..8).map(|i| {
        let pool = pool.clone();
        let shot = tree.shot;
        async move {
            VersionRepo::create(
                &pool,
                EntityKind::Shot,
                None,
                &CreateVersion {
                    entity_type: "shot".to_string(),
                    entity_id: shot,
                    code: format!("RACE_{i}"),
                    name: "Race".to_string(),
                    description: None,
                    status: None,
                    latest: None,
                },
            )
            .await
            .map(|_| ())
        }
    });
    let delete = {
        let pool = pool.clone();
        async move { ProjectRepo::delete(&pool, tree.project).await.map(|_| ()) }
    };

    let (created, deleted) = futures::join!(join_all(creates), delete);
    deleted.unwrap();
    for result in created {
        result.unwrap();
    }

    assert_eq!(count(&pool, "versions").await, 0);
    assert_eq!(orphans(&pool).await, (0, 0));
}

fn note_input(kind: EntityKind, link_id: i64, i: usize) -> CreateNote {
    CreateNote {
        link_type: kind.as_str().to_string(),
        link_id,
        subject: format!("Race {i}"),
        content: "Hold on frame 1012.".to_string(),
        status: None,
    }
}

/// A note insert that has already locked its version must finish before
/// the version delete removes the version's notes.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_version_delete_waits_for_in_flight_note(pool: PgPool) {
    let tree = build_tree(&pool, "inflight").await;

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM versions WHERE id = $1 FOR SHARE")
        .bind(tree.shot_version)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO notes (link_type, link_id, subject, content, status)
         VALUES ('version', $1, 'Late note', 'Arrived mid-delete.', 'open')",
    )
    .bind(tree.shot_version)
    .execute(&mut *tx)
    .await
    .unwrap();

    let delete = tokio::spawn({
        let pool = pool.clone();
        let id = tree.shot_version;
        async move { VersionRepo::delete(&pool, id).await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    tx.commit().await.unwrap();

    let summary = delete.await.unwrap().unwrap().unwrap();
    assert_eq!(summary.versions, 1);
    assert_eq!(summary.notes, 2, "existing note plus the one committed mid-delete");
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_version_delete_racing_note_creates_leaves_no_orphans(pool: PgPool) {
    let tree = build_tree(&pool, "vnote").await;

    let creates = (0..8).map(|i| {
        let pool = pool.clone();
        let version = tree.shot_version;
        async move {
            let input = note_input(EntityKind::Version, version, i);
            NoteRepo::create(&pool, EntityKind::Version, None, &input)
                .await
                .map(|_| ())
        }
    });
    let delete = {
        let pool = pool.clone();
        async move { VersionRepo::delete(&pool, tree.shot_version).await.map(|_| ()) }
    };

    let (created, deleted) = futures::join!(join_all(creates), delete);
    deleted.unwrap();
    for result in created {
        result.unwrap();
    }

    assert!(!EntityRepo::exists(&pool, EntityKind::Version, tree.shot_version).await.unwrap());
    assert_eq!(orphans(&pool).await, (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hierarchy_delete_racing_note_creates_leaves_no_orphans(pool: PgPool) {
    let tree = build_tree(&pool, "hnote").await;

    let targets = [
        (EntityKind::Shot, tree.shot),
        (EntityKind::Version, tree.shot_version),
        (EntityKind::Asset, tree.asset),
        (EntityKind::Project, tree.project),
    ];
    let creates = (0..8).map(|i| {
        let pool = pool.clone();
        let (kind, id) = targets[i % targets.len()];
        async move {
            NoteRepo::create(&pool, kind, None, &note_input(kind, id, i))
                .await
                .map(|_| ())
        }
    });
    let deletes = {
        let pool = pool.clone();
        async move {
            ShotRepo::delete(&pool, tree.shot).await?;
            ProjectRepo::delete(&pool, tree.project).await.map(|_| ())
        }
    };

    let (created, deleted) = futures::join!(join_all(creates), deletes);
    deleted.unwrap();
    for result in created {
        result.unwrap();
    }

    assert_eq!(count(&pool, "projects").await, 0);
    assert_eq!(count(&pool, "notes").await, 0);
    assert_eq!(orphans(&pool).await, (0, 0));
}
