//! Integration tests for the Project → Episode → Sequence → Shot/Asset
//! repositories: CRUD, defaults, filtering and code uniqueness.

use assert_matches::assert_matches;
use futures::future::join_all;
use reeltrack_db::models::asset::{CreateAsset, UpdateAsset};
use reeltrack_db::models::episode::{CreateEpisode, UpdateEpisode};
use reeltrack_db::models::project::{CreateProject, UpdateProject};
use reeltrack_db::models::sequence::CreateSequence;
use reeltrack_db::models::shot::{CreateShot, UpdateShot};
use reeltrack_db::repositories::{AssetRepo, EpisodeRepo, ProjectRepo, SequenceRepo, ShotRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(code: &str) -> CreateProject {
    CreateProject {
        code: code.to_string(),
        name: format!("Project {code}"),
        description: None,
        status: None,
    }
}

fn new_episode(code: &str) -> CreateEpisode {
    CreateEpisode {
        code: code.to_string(),
        name: format!("Episode {code}"),
        description: None,
        status: None,
    }
}

fn new_sequence(code: &str) -> CreateSequence {
    CreateSequence {
        code: code.to_string(),
        name: format!("Sequence {code}"),
        description: None,
        status: None,
    }
}

fn new_shot(code: &str, cut_in: Option<i32>, cut_out: Option<i32>) -> CreateShot {
    CreateShot {
        code: code.to_string(),
        name: format!("Shot {code}"),
        description: None,
        status: None,
        cut_in,
        cut_out,
    }
}

fn unique_violation(err: &sqlx::Error) -> Option<String> {
    let db = err.as_database_error()?;
    (db.code().as_deref() == Some("23505")).then(|| db.constraint().unwrap_or_default().to_string())
}

/// Returns (project_id, episode_id, sequence_id).
async fn setup_sequence(pool: &PgPool, suffix: &str) -> (i64, i64, i64) {
    let project = ProjectRepo::create(pool, None, &new_project(&format!("P_{suffix}")))
        .await
        .unwrap();
    let episode = EpisodeRepo::create(pool, project.id, &new_episode(&format!("EP_{suffix}")))
        .await
        .unwrap();
    let sequence = SequenceRepo::create(pool, episode.id, &new_sequence(&format!("SQ_{suffix}")))
        .await
        .unwrap();
    (project.id, episode.id, sequence.id)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_defaults_and_update(pool: PgPool) {
    let project = ProjectRepo::create(&pool, None, &new_project("ALPHA")).await.unwrap();
    assert_eq!(project.code, "ALPHA");
    assert_eq!(project.status, "active");
    assert!(project.description.is_none());

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            status: Some("on_hold".to_string()),
            description: Some("Pilot".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "on_hold");
    assert_eq!(updated.description.as_deref(), Some("Pilot"));
    assert_eq!(updated.name, project.name, "untouched fields are kept");

    let missing = ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_list_filters_and_paginates(pool: PgPool) {
    for code in ["A", "B", "C"] {
        ProjectRepo::create(&pool, None, &new_project(code)).await.unwrap();
    }
    let mut bidding = new_project("D");
    bidding.status = Some("bidding".to_string());
    ProjectRepo::create(&pool, None, &bidding).await.unwrap();

    assert_eq!(ProjectRepo::count(&pool, None).await.unwrap(), 4);
    assert_eq!(ProjectRepo::count(&pool, Some("bidding")).await.unwrap(), 1);

    let page = ProjectRepo::list(&pool, None, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].code, "D", "newest first");

    let rest = ProjectRepo::list(&pool, None, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[1].code, "A");

    let filtered = ProjectRepo::list(&pool, Some("bidding"), 20, 0).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].code, "D");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unicode_round_trips(pool: PgPool) {
    let mut input = new_project("UNI");
    input.name = "第一話 — Café 🎬".to_string();
    input.description = Some("مراجعة اللقطة".to_string());
    let project = ProjectRepo::create(&pool, None, &input).await.unwrap();

    let loaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "第一話 — Café 🎬");
    assert_eq!(loaded.description.as_deref(), Some("مراجعة اللقطة"));
}

// ---------------------------------------------------------------------------
// Code uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_code_is_rejected(pool: PgPool) {
    ProjectRepo::create(&pool, None, &new_project("DUP")).await.unwrap();
    let err = ProjectRepo::create(&pool, None, &new_project("DUP")).await.unwrap_err();
    assert_eq!(unique_violation(&err).as_deref(), Some("uq_projects_code"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_codes_are_scoped_per_entity_type(pool: PgPool) {
    let project = ProjectRepo::create(&pool, None, &new_project("SAME")).await.unwrap();
    let episode = EpisodeRepo::create(&pool, project.id, &new_episode("SAME")).await;
    assert!(episode.is_ok(), "episode may reuse a project code");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_duplicate_creates_yield_one_success(pool: PgPool) {
    let (project_id, _, _) = setup_sequence(&pool, "race").await;

    let attempts = (0..10).map(|_| {
        let pool = pool.clone();
        async move { EpisodeRepo::create(&pool, project_id, &new_episode("RACE")).await }
    });
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one create wins");
    for result in results.iter().filter(|r| r.is_err()) {
        let err = result.as_ref().unwrap_err();
        assert_eq!(unique_violation(err).as_deref(), Some("uq_episodes_code"));
    }
    assert_eq!(
        EpisodeRepo::count_by_project(&pool, project_id, None).await.unwrap(),
        2,
        "setup episode plus the single winner"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_to_taken_code_conflicts(pool: PgPool) {
    let (project_id, _, _) = setup_sequence(&pool, "upd").await;
    let second = EpisodeRepo::create(&pool, project_id, &new_episode("EP_TWO")).await.unwrap();

    let err = EpisodeRepo::update(
        &pool,
        second.id,
        &UpdateEpisode {
            code: Some("EP_upd".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(unique_violation(&err).as_deref(), Some("uq_episodes_code"));
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_child_requires_existing_parent(pool: PgPool) {
    let err = EpisodeRepo::create(&pool, 424_242, &new_episode("ORPHAN")).await.unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_frame_count_is_derived(pool: PgPool) {
    let (_, _, sequence_id) = setup_sequence(&pool, "frames").await;

    let shot = ShotRepo::create(&pool, sequence_id, &new_shot("SH010", Some(1001), Some(1100)))
        .await
        .unwrap();
    assert_eq!(shot.status, "waiting");
    assert_eq!(shot.frame_count, Some(100));

    let open = ShotRepo::create(&pool, sequence_id, &new_shot("SH020", Some(1001), None))
        .await
        .unwrap();
    assert_eq!(open.frame_count, None);

    let extended = ShotRepo::update(
        &pool,
        shot.id,
        &UpdateShot {
            cut_out: Some(1200),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(extended.frame_count, Some(200));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_cut_range_check(pool: PgPool) {
    let (_, _, sequence_id) = setup_sequence(&pool, "range").await;
    let shot = ShotRepo::create(&pool, sequence_id, &new_shot("SH010", Some(1001), Some(1100)))
        .await
        .unwrap();

    let err = ShotRepo::update(
        &pool,
        shot.id,
        &UpdateShot {
            cut_out: Some(900),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    let db = err.as_database_error().unwrap();
    assert_eq!(db.code().as_deref(), Some("23514"));
    assert_eq!(db.constraint(), Some("ck_shots_cut_range"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shots_list_in_cut_order(pool: PgPool) {
    let (_, _, sequence_id) = setup_sequence(&pool, "order").await;
    ShotRepo::create(&pool, sequence_id, &new_shot("SH030", Some(2001), Some(2100)))
        .await
        .unwrap();
    ShotRepo::create(&pool, sequence_id, &new_shot("SH010", Some(1001), Some(1100)))
        .await
        .unwrap();
    ShotRepo::create(&pool, sequence_id, &new_shot("SH099", None, None))
        .await
        .unwrap();

    let shots = ShotRepo::list_by_sequence(&pool, sequence_id, None, 20, 0).await.unwrap();
    let codes: Vec<&str> = shots.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, ["SH010", "SH030", "SH099"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_asset_defaults_and_filter(pool: PgPool) {
    let (_, _, sequence_id) = setup_sequence(&pool, "assets").await;

    let prop = AssetRepo::create(
        &pool,
        sequence_id,
        &CreateAsset {
            code: "PROP_SWORD".to_string(),
            name: "Sword".to_string(),
            description: None,
            status: Some("in_progress".to_string()),
            asset_type: Some("prop".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(prop.asset_type, "prop");

    let other = AssetRepo::create(
        &pool,
        sequence_id,
        &CreateAsset {
            code: "MISC".to_string(),
            name: "Misc".to_string(),
            description: None,
            status: None,
            asset_type: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(other.asset_type, "other");
    assert_eq!(other.status, "waiting");

    let in_progress = AssetRepo::list_by_sequence(&pool, sequence_id, Some("in_progress"), 20, 0)
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id, prop.id);

    let renamed = AssetRepo::update(
        &pool,
        other.id,
        &UpdateAsset {
            asset_type: Some("vehicle".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.asset_type, "vehicle");
    assert_matches!(AssetRepo::count_by_sequence(&pool, sequence_id, None).await, Ok(2));
}
