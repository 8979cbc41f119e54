//! Integration tests for the DUR review workflow: terminal transitions,
//! atomic merges, and the comment thread.

use assert_matches::assert_matches;
use sqlx::PgPool;

use dochub_db::models::document::CreateDocument;
use dochub_db::models::dur::{CreateDur, Dur, ReviewOutcome};
use dochub_db::models::repository::CreateRepository;
use dochub_db::models::user::CreateUser;
use dochub_db::repositories::{
    DocumentRepo, DurCommentRepo, DurRepo, RepositoryRepo, UserRepo, VersionRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Seed a repo with one document and one open DUR proposing `proposed`.
async fn seed_open_dur(pool: &PgPool, author: i64, proposed: &str) -> (i64, i64, Dur) {
    let repo = RepositoryRepo::create(
        pool,
        &CreateRepository {
            name: "Docs".to_string(),
            slug: None,
            description: None,
            is_public: true,
        },
        "docs",
        author,
    )
    .await
    .unwrap();

    let doc = DocumentRepo::create(
        pool,
        repo.id,
        &CreateDocument {
            title: "Guide".to_string(),
            slug: None,
            current_content: "v1".to_string(),
        },
        "guide",
        author,
    )
    .await
    .unwrap();

    let dur = DurRepo::create(
        pool,
        repo.id,
        &CreateDur {
            document_id: doc.id,
            title: "Improve wording".to_string(),
            description: Some("makes it clearer".to_string()),
            proposed_content: proposed.to_string(),
        },
        author,
    )
    .await
    .unwrap();
    assert_eq!(dur.status, "open");
    assert!(dur.reviewed_by.is_none());
    assert!(dur.reviewed_at.is_none());

    (repo.id, doc.id, dur)
}

// ---------------------------------------------------------------------------
// Test: approval merges content atomically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_merges_and_creates_version(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let (repo_id, doc_id, dur) = seed_open_dur(&pool, author, "v2 proposed").await;

    let outcome = DurRepo::approve(&pool, repo_id, dur.id, reviewer, Some("ship it"))
        .await
        .unwrap()
        .expect("DUR exists");

    let merged = assert_matches!(outcome, ReviewOutcome::Reviewed(d) => d);
    assert_eq!(merged.status, "merged");
    assert_eq!(merged.reviewed_by, Some(reviewer));
    assert!(merged.reviewed_at.is_some());
    assert_eq!(merged.review_comment.as_deref(), Some("ship it"));

    // The document advanced to the proposed content in the same unit.
    let doc = DocumentRepo::find_by_id(&pool, doc_id).await.unwrap().unwrap();
    assert_eq!(doc.current_content, "v2 proposed");

    let versions = VersionRepo::list_by_document(&pool, doc_id).await.unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].version_number, 2);
    assert_eq!(versions[0].content, "v2 proposed");
    assert_eq!(versions[0].created_by, reviewer);
    assert_eq!(
        versions[0].commit_message.as_deref(),
        Some("Merged DUR: Improve wording")
    );
}

// ---------------------------------------------------------------------------
// Test: rejection records review fields without touching the document
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_leaves_document_untouched(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let (repo_id, doc_id, dur) = seed_open_dur(&pool, author, "v2 proposed").await;

    let outcome = DurRepo::reject(&pool, repo_id, dur.id, reviewer, Some("not needed"))
        .await
        .unwrap()
        .expect("DUR exists");

    let rejected = assert_matches!(outcome, ReviewOutcome::Reviewed(d) => d);
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.reviewed_by, Some(reviewer));
    assert_eq!(rejected.review_comment.as_deref(), Some("not needed"));

    let doc = DocumentRepo::find_by_id(&pool, doc_id).await.unwrap().unwrap();
    assert_eq!(doc.current_content, "v1");
    let versions = VersionRepo::list_by_document(&pool, doc_id).await.unwrap();
    assert_eq!(versions.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: terminal states are final and side-effect free
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_review_has_no_effect(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let other = seed_user(&pool, "other").await;
    let (repo_id, doc_id, dur) = seed_open_dur(&pool, author, "v2").await;

    DurRepo::reject(&pool, repo_id, dur.id, reviewer, Some("no"))
        .await
        .unwrap();

    // A second reject and a late approve must both observe the closed
    // state and change nothing.
    let outcome = DurRepo::reject(&pool, repo_id, dur.id, other, Some("again"))
        .await
        .unwrap()
        .unwrap();
    assert_matches!(outcome, ReviewOutcome::NotOpen { ref status } if status == "rejected");

    let outcome = DurRepo::approve(&pool, repo_id, dur.id, other, None)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(outcome, ReviewOutcome::NotOpen { ref status } if status == "rejected");

    let current = DurRepo::find_in_repo(&pool, repo_id, dur.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, "rejected");
    assert_eq!(current.reviewed_by, Some(reviewer), "review fields set exactly once");
    assert_eq!(current.review_comment.as_deref(), Some("no"));

    // No version was created by the failed transitions.
    let versions = VersionRepo::list_by_document(&pool, doc_id).await.unwrap();
    assert_eq!(versions.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_nonexistent_dur_returns_none(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let (repo_id, _doc_id, _dur) = seed_open_dur(&pool, author, "v2").await;

    let outcome = DurRepo::approve(&pool, repo_id, 424242, author, None)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

// ---------------------------------------------------------------------------
// Test: listing and status filter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_repo_with_status_filter(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let (repo_id, doc_id, first) = seed_open_dur(&pool, author, "v2").await;

    let second = DurRepo::create(
        &pool,
        repo_id,
        &CreateDur {
            document_id: doc_id,
            title: "Second".to_string(),
            description: None,
            proposed_content: "v3".to_string(),
        },
        author,
    )
    .await
    .unwrap();

    DurRepo::reject(&pool, repo_id, first.id, reviewer, None)
        .await
        .unwrap();

    let all = DurRepo::list_by_repo(&pool, repo_id, None).await.unwrap();
    assert_eq!(all.len(), 2);
    // Newest first.
    assert_eq!(all[0].id, second.id);

    let open = DurRepo::list_by_repo(&pool, repo_id, Some("open")).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, second.id);

    let rejected = DurRepo::list_by_repo(&pool, repo_id, Some("rejected"))
        .await
        .unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].id, first.id);
}

// ---------------------------------------------------------------------------
// Test: comment thread
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comments_append_in_order_and_survive_close(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let (repo_id, _doc_id, dur) = seed_open_dur(&pool, author, "v2").await;

    DurCommentRepo::create(&pool, dur.id, author, "first").await.unwrap();
    DurCommentRepo::create(&pool, dur.id, reviewer, "second").await.unwrap();

    DurRepo::reject(&pool, repo_id, dur.id, reviewer, None)
        .await
        .unwrap();

    // Comments on closed reviews remain valid (audit trail).
    DurCommentRepo::create(&pool, dur.id, author, "post-close").await.unwrap();

    let comments = DurCommentRepo::list_by_dur(&pool, dur.id).await.unwrap();
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "post-close"]);
}
