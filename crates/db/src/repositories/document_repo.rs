//! Repository for the `documents` table.
//!
//! Owns the version-history invariants: creating a document seeds
//! version 1, and every content update appends exactly one version and
//! advances the live snapshot in the same transaction. Concurrent edits
//! to one document serialize on a `FOR UPDATE` lock of its row.

use dochub_core::document::{default_commit_message, INITIAL_COMMIT_MESSAGE};
use dochub_core::slug;
use dochub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::document::{CreateDocument, Document, UpdateDocument};
use crate::repositories::version_repo::VersionRepo;

/// Column list for documents queries.
const COLUMNS: &str =
    "id, repo_id, title, slug, current_content, created_by, created_at, updated_at";

/// Provides CRUD operations for documents and their version history.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a document and its first version atomically.
    ///
    /// The slug is resolved against the repository scope inside the same
    /// transaction as the insert.
    pub async fn create(
        pool: &PgPool,
        repo_id: DbId,
        input: &CreateDocument,
        slug_base: &str,
        author: DbId,
    ) -> Result<Document, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let doc_slug = resolve_unique_slug(&mut tx, repo_id, slug_base).await?;

        let query = format!(
            "INSERT INTO documents (repo_id, title, slug, current_content, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let doc = sqlx::query_as::<_, Document>(&query)
            .bind(repo_id)
            .bind(&input.title)
            .bind(&doc_slug)
            .bind(&input.current_content)
            .bind(author)
            .fetch_one(&mut *tx)
            .await?;

        VersionRepo::create(
            &mut tx,
            doc.id,
            1,
            &input.current_content,
            Some(INITIAL_COMMIT_MESSAGE),
            author,
        )
        .await?;

        tx.commit().await?;
        Ok(doc)
    }

    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a document by slug within a repository.
    pub async fn find_by_slug(
        pool: &PgPool,
        repo_id: DbId,
        doc_slug: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE repo_id = $1 AND slug = $2");
        sqlx::query_as::<_, Document>(&query)
            .bind(repo_id)
            .bind(doc_slug)
            .fetch_optional(pool)
            .await
    }

    /// List a repository's documents, most recently updated first.
    pub async fn list_by_repo(
        pool: &PgPool,
        repo_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE repo_id = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(repo_id)
            .fetch_all(pool)
            .await
    }

    /// Update title and/or content. A content change appends the next
    /// version and advances the snapshot atomically; a title-only change
    /// leaves the version history untouched. Returns `None` if the
    /// document is absent.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
        author: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Serialize concurrent edits to this document.
        let locked = lock_document(&mut tx, id).await?;
        if locked.is_none() {
            return Ok(None);
        }

        if let Some(title) = &input.title {
            sqlx::query("UPDATE documents SET title = $1, updated_at = NOW() WHERE id = $2")
                .bind(title)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(content) = &input.current_content {
            let next_version = VersionRepo::latest_version_number(&mut tx, id).await? + 1;
            let default_message = default_commit_message(next_version);
            let message = input.commit_message.as_deref().unwrap_or(&default_message);

            VersionRepo::create(&mut tx, id, next_version, content, Some(message), author)
                .await?;

            sqlx::query(
                "UPDATE documents SET current_content = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        let doc = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(doc))
    }

    /// Delete a document. Versions, DURs, and their comments cascade.
    /// Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Take a row lock on a document, returning its id if it exists.
async fn lock_document(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    sqlx::query_scalar::<_, DbId>("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Probe `base`, `base-1`, `base-2`, ... within the repository scope and
/// return the first free candidate; past the probe cap, fall back to a
/// random suffix.
async fn resolve_unique_slug(
    conn: &mut PgConnection,
    repo_id: DbId,
    base: &str,
) -> Result<String, sqlx::Error> {
    for n in 0..=slug::MAX_SLUG_PROBES {
        let candidate = slug::numbered_candidate(base, n);
        if !slug_exists(conn, repo_id, &candidate).await? {
            return Ok(candidate);
        }
    }
    let fallback = slug::random_candidate(base);
    tracing::warn!(repo_id, base, fallback = %fallback, "Slug probe limit reached, using random suffix");
    Ok(fallback)
}

async fn slug_exists(
    conn: &mut PgConnection,
    repo_id: DbId,
    candidate: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM documents WHERE repo_id = $1 AND slug = $2)",
    )
    .bind(repo_id)
    .bind(candidate)
    .fetch_one(conn)
    .await
}
