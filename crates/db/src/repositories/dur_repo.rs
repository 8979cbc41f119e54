//! Repository for the `durs` table: the review workflow state machine.
//!
//! A DUR is `open` until exactly one terminal transition: `merged` (via
//! [`DurRepo::approve`], which also writes the new document version) or
//! `rejected`. Both transitions lock the DUR row and re-check its status
//! under the lock, so a concurrent reviewer observes `NotOpen` rather
//! than double-applying the transition.

use dochub_core::review;
use dochub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::dur::{CreateDur, Dur, ReviewOutcome};

/// Column list for durs queries.
const COLUMNS: &str = "id, repo_id, document_id, title, description, proposed_content, \
    status, created_by, reviewed_by, reviewed_at, review_comment, created_at";

/// Provides create/list/review operations for Document Update Requests.
pub struct DurRepo;

impl DurRepo {
    /// Create a new DUR in the `open` state.
    ///
    /// The caller has already verified that the document belongs to the
    /// repository.
    pub async fn create(
        pool: &PgPool,
        repo_id: DbId,
        input: &CreateDur,
        author: DbId,
    ) -> Result<Dur, sqlx::Error> {
        let query = format!(
            "INSERT INTO durs (repo_id, document_id, title, description, proposed_content, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dur>(&query)
            .bind(repo_id)
            .bind(input.document_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.proposed_content)
            .bind(author)
            .fetch_one(pool)
            .await
    }

    /// Find a DUR by ID, scoped to a repository.
    pub async fn find_in_repo(
        pool: &PgPool,
        repo_id: DbId,
        dur_id: DbId,
    ) -> Result<Option<Dur>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM durs WHERE id = $1 AND repo_id = $2");
        sqlx::query_as::<_, Dur>(&query)
            .bind(dur_id)
            .bind(repo_id)
            .fetch_optional(pool)
            .await
    }

    /// List a repository's DURs, newest first, optionally filtered by
    /// status.
    pub async fn list_by_repo(
        pool: &PgPool,
        repo_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Dur>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM durs
             WHERE repo_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Dur>(&query)
            .bind(repo_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Approve a DUR: merge its proposed content into the document as the
    /// next version and mark the DUR `merged`, all in one transaction.
    ///
    /// Partial application is never observable -- the version insert, the
    /// snapshot update, and the status flip land together or not at all.
    pub async fn approve(
        pool: &PgPool,
        repo_id: DbId,
        dur_id: DbId,
        reviewer: DbId,
        review_comment: Option<&str>,
    ) -> Result<Option<ReviewOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(dur) = lock_dur(&mut tx, repo_id, dur_id).await? else {
            return Ok(None);
        };
        if dur.status != review::STATUS_OPEN {
            return Ok(Some(ReviewOutcome::NotOpen { status: dur.status }));
        }

        // Serialize against concurrent direct edits of the document.
        sqlx::query("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
            .bind(dur.document_id)
            .execute(&mut *tx)
            .await?;

        let next_version = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM document_versions
             WHERE document_id = $1",
        )
        .bind(dur.document_id)
        .fetch_one(&mut *tx)
        .await?;

        let message = review::merge_commit_message(&dur.title);
        sqlx::query(
            "INSERT INTO document_versions
                (document_id, content, version_number, commit_message, created_by)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(dur.document_id)
        .bind(&dur.proposed_content)
        .bind(next_version)
        .bind(&message)
        .bind(reviewer)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE documents SET current_content = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(&dur.proposed_content)
        .bind(dur.document_id)
        .execute(&mut *tx)
        .await?;

        let dur = close_dur(&mut tx, dur.id, review::STATUS_MERGED, reviewer, review_comment)
            .await?;

        tx.commit().await?;
        Ok(Some(ReviewOutcome::Reviewed(dur)))
    }

    /// Reject a DUR: flip it to `rejected` and record the review fields.
    /// No document mutation.
    pub async fn reject(
        pool: &PgPool,
        repo_id: DbId,
        dur_id: DbId,
        reviewer: DbId,
        review_comment: Option<&str>,
    ) -> Result<Option<ReviewOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(dur) = lock_dur(&mut tx, repo_id, dur_id).await? else {
            return Ok(None);
        };
        if dur.status != review::STATUS_OPEN {
            return Ok(Some(ReviewOutcome::NotOpen { status: dur.status }));
        }

        let dur = close_dur(&mut tx, dur.id, review::STATUS_REJECTED, reviewer, review_comment)
            .await?;

        tx.commit().await?;
        Ok(Some(ReviewOutcome::Reviewed(dur)))
    }
}

/// Lock a DUR row for review, returning it if it exists in the repository.
async fn lock_dur(
    conn: &mut PgConnection,
    repo_id: DbId,
    dur_id: DbId,
) -> Result<Option<Dur>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM durs WHERE id = $1 AND repo_id = $2 FOR UPDATE");
    sqlx::query_as::<_, Dur>(&query)
        .bind(dur_id)
        .bind(repo_id)
        .fetch_optional(conn)
        .await
}

/// Apply the terminal transition: set status and the review fields once.
async fn close_dur(
    conn: &mut PgConnection,
    dur_id: DbId,
    status: &str,
    reviewer: DbId,
    review_comment: Option<&str>,
) -> Result<Dur, sqlx::Error> {
    let query = format!(
        "UPDATE durs SET status = $1, reviewed_by = $2, reviewed_at = NOW(), review_comment = $3
         WHERE id = $4
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Dur>(&query)
        .bind(status)
        .bind(reviewer)
        .bind(review_comment)
        .bind(dur_id)
        .fetch_one(conn)
        .await
}
