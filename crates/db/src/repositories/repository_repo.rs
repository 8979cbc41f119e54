//! Repository for the `repositories` table.
//!
//! Slug uniqueness is global; the candidate probe and the insert run in
//! the same transaction so concurrent creations cannot settle on the
//! same slug.

use dochub_core::slug;
use dochub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::repository::{CreateRepository, Repository, UpdateRepository};

/// Column list for repositories queries.
const COLUMNS: &str = "id, name, slug, description, is_public, owner_id, created_at, updated_at";

/// Provides CRUD operations for repositories.
pub struct RepositoryRepo;

impl RepositoryRepo {
    /// Create a new repository, resolving a globally unique slug from the
    /// given base inside the inserting transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRepository,
        slug_base: &str,
        owner_id: DbId,
    ) -> Result<Repository, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slug = resolve_unique_slug(&mut tx, slug_base).await?;

        let query = format!(
            "INSERT INTO repositories (name, slug, description, is_public, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let repo = sqlx::query_as::<_, Repository>(&query)
            .bind(&input.name)
            .bind(&slug)
            .bind(&input.description)
            .bind(input.is_public)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(repo)
    }

    /// Find a repository by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Repository>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repositories WHERE id = $1");
        sqlx::query_as::<_, Repository>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a repository by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Repository>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repositories WHERE slug = $1");
        sqlx::query_as::<_, Repository>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List public repositories only (anonymous callers).
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Repository>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repositories
             WHERE is_public = TRUE
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Repository>(&query).fetch_all(pool).await
    }

    /// List every repository (global admins).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Repository>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repositories ORDER BY created_at DESC");
        sqlx::query_as::<_, Repository>(&query).fetch_all(pool).await
    }

    /// List repositories visible to a user: public, owned, or member-of.
    pub async fn list_visible_to(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Repository>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repositories
             WHERE is_public = TRUE
                OR owner_id = $1
                OR id IN (SELECT repo_id FROM repository_members WHERE user_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Repository>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update name/description/visibility. Returns `None` if the
    /// repository does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRepository,
    ) -> Result<Option<Repository>, sqlx::Error> {
        let query = format!(
            "UPDATE repositories SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                is_public = COALESCE($3, is_public),
                updated_at = NOW()
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Repository>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_public)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a repository. Documents, versions, DURs, comments, and
    /// memberships cascade. Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Probe `base`, `base-1`, `base-2`, ... against the global slug scope and
/// return the first free candidate; past the probe cap, fall back to a
/// random suffix.
async fn resolve_unique_slug(
    conn: &mut PgConnection,
    base: &str,
) -> Result<String, sqlx::Error> {
    for n in 0..=slug::MAX_SLUG_PROBES {
        let candidate = slug::numbered_candidate(base, n);
        if !slug_exists(conn, &candidate).await? {
            return Ok(candidate);
        }
    }
    let fallback = slug::random_candidate(base);
    tracing::warn!(base, fallback = %fallback, "Slug probe limit reached, using random suffix");
    Ok(fallback)
}

async fn slug_exists(conn: &mut PgConnection, candidate: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM repositories WHERE slug = $1)")
        .bind(candidate)
        .fetch_one(conn)
        .await
}
