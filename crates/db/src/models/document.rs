//! Document and version entity models and DTOs.
//!
//! Versions are immutable snapshots; `Document.current_content` always
//! mirrors the content of the highest-numbered version.

use dochub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub repo_id: DbId,
    pub title: String,
    pub slug: String,
    pub current_content: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `document_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    pub content: String,
    pub version_number: i32,
    pub commit_message: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a new document.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    /// Auto-generated from title if `None`.
    pub slug: Option<String>,
    #[serde(default)]
    pub current_content: String,
}

/// DTO for updating an existing document.
///
/// A title-only update does not create a version; a content update
/// appends one, using `commit_message` when supplied.
#[derive(Debug, Deserialize)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub current_content: Option<String>,
    pub commit_message: Option<String>,
}
