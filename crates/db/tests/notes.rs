//! Integration tests for notes and their polymorphic links.

use reeltrack_core::entity::EntityKind;
use reeltrack_db::models::note::{CreateNote, NoteFilter, UpdateNote};
use reeltrack_db::models::project::CreateProject;
use reeltrack_db::models::user::CreateUser;
use reeltrack_db::repositories::{NoteRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

async fn setup(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "supervisor".to_string(),
            email: "supervisor@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: "producer".to_string(),
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        Some(user.id),
        &CreateProject {
            code: "NOTES".to_string(),
            name: "Notes project".to_string(),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap();
    (user.id, project.id)
}

fn new_note(project_id: i64, subject: &str) -> CreateNote {
    CreateNote {
        link_type: "project".to_string(),
        link_id: project_id,
        subject: subject.to_string(),
        content: "Grade is too warm in the second half.".to_string(),
        status: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_filter(pool: PgPool) {
    let (user_id, project_id) = setup(&pool).await;

    let mine = NoteRepo::create(&pool, EntityKind::Project, Some(user_id), &new_note(project_id, "Mine"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mine.status, "open");
    assert_eq!(mine.author_id, Some(user_id));

    NoteRepo::create(&pool, EntityKind::Project, None, &new_note(project_id, "Anonymous"))
        .await
        .unwrap()
        .unwrap();

    let by_link = NoteFilter {
        link_type: Some("project".to_string()),
        link_id: Some(project_id),
        ..Default::default()
    };
    assert_eq!(NoteRepo::count(&pool, &by_link).await.unwrap(), 2);

    let by_author = NoteFilter {
        author_id: Some(user_id),
        ..Default::default()
    };
    let notes = NoteRepo::list(&pool, &by_author, 20, 0).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].subject, "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_missing_link_returns_none(pool: PgPool) {
    let note = NoteRepo::create(&pool, EntityKind::Shot, None, &new_note(404, "Lost"))
        .await
        .unwrap();
    assert!(note.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete(pool: PgPool) {
    let (user_id, project_id) = setup(&pool).await;
    let note = NoteRepo::create(&pool, EntityKind::Project, Some(user_id), &new_note(project_id, "Fix"))
        .await
        .unwrap()
        .unwrap();

    let updated = NoteRepo::update(
        &pool,
        note.id,
        &UpdateNote {
            status: Some("addressed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "addressed");
    assert_eq!(updated.subject, "Fix");

    assert!(NoteRepo::delete(&pool, note.id).await.unwrap());
    assert!(!NoteRepo::delete(&pool, note.id).await.unwrap());
    assert!(NoteRepo::find_by_id(&pool, note.id).await.unwrap().is_none());
}
