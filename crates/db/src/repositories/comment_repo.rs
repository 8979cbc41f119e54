//! Repository for the `dur_comments` table.
//!
//! Comments are append-only and remain valid in any DUR state, including
//! after a merge or rejection (audit trail).

use dochub_core::types::DbId;
use sqlx::PgPool;

use crate::models::dur::DurComment;

/// Column list for dur_comments queries.
const COLUMNS: &str = "id, dur_id, user_id, content, created_at";

/// Provides append and list operations for DUR comments.
pub struct DurCommentRepo;

impl DurCommentRepo {
    /// Append a comment to a DUR.
    pub async fn create(
        pool: &PgPool,
        dur_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<DurComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO dur_comments (dur_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DurComment>(&query)
            .bind(dur_id)
            .bind(user_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// List a DUR's comments, oldest first.
    pub async fn list_by_dur(
        pool: &PgPool,
        dur_id: DbId,
    ) -> Result<Vec<DurComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dur_comments WHERE dur_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, DurComment>(&query)
            .bind(dur_id)
            .fetch_all(pool)
            .await
    }
}
