//! Repository for the `repository_members` table.
//!
//! Pure data-mutation boundary: authorization (repo admin required) is
//! enforced by the callers before these methods run.

use dochub_core::access::RepoRole;
use dochub_core::types::DbId;
use sqlx::PgPool;

use crate::models::repository::{Member, MemberWithUser};

/// Column list for repository_members queries.
const COLUMNS: &str = "repo_id, user_id, role, created_at";

/// Provides membership lookup and mutation for repositories.
pub struct MemberRepo;

impl MemberRepo {
    /// Find the membership row for a (repository, user) pair.
    pub async fn find(
        pool: &PgPool,
        repo_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM repository_members WHERE repo_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Member>(&query)
            .bind(repo_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all members of a repository with their usernames.
    pub async fn list(pool: &PgPool, repo_id: DbId) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithUser>(
            "SELECT m.repo_id, m.user_id, u.username, m.role, m.created_at
             FROM repository_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.repo_id = $1
             ORDER BY m.created_at ASC",
        )
        .bind(repo_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a membership row or overwrite the role of an existing one.
    pub async fn upsert(
        pool: &PgPool,
        repo_id: DbId,
        user_id: DbId,
        role: RepoRole,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO repository_members (repo_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (repo_id, user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(repo_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Remove a membership row. Returns `false` if none existed.
    pub async fn remove(
        pool: &PgPool,
        repo_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM repository_members WHERE repo_id = $1 AND user_id = $2")
                .bind(repo_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
