//! Repository for the `document_versions` table.
//!
//! Versions are immutable snapshots; they are only ever inserted inside a
//! transaction that also updates the owning document, so the insert
//! method takes a live connection rather than the pool.

use dochub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::document::DocumentVersion;

/// Column list for document_versions queries.
const COLUMNS: &str =
    "id, document_id, content, version_number, commit_message, created_by, created_at";

/// Provides read and (transactional) create operations for versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert a version snapshot within the caller's transaction.
    ///
    /// The caller must hold a row lock on the owning document so that
    /// `version_number` assignment cannot race; the per-document unique
    /// constraint is the backstop.
    pub async fn create(
        conn: &mut PgConnection,
        document_id: DbId,
        version_number: i32,
        content: &str,
        commit_message: Option<&str>,
        created_by: DbId,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_versions
                (document_id, content, version_number, commit_message, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(content)
            .bind(version_number)
            .bind(commit_message)
            .bind(created_by)
            .fetch_one(conn)
            .await
    }

    /// Highest version number for a document (0 if it has none yet).
    pub async fn latest_version_number(
        conn: &mut PgConnection,
        document_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) FROM document_versions WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(conn)
        .await
    }

    /// List a document's versions, newest first.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch a single version of a document by number.
    pub async fn find_by_document_and_number(
        pool: &PgPool,
        document_id: DbId,
        version_number: i32,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }
}
