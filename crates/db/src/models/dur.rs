//! Document Update Request (DUR) and comment models and DTOs.

use dochub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `durs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dur {
    pub id: DbId,
    pub repo_id: DbId,
    pub document_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub proposed_content: String,
    pub status: String,
    pub created_by: DbId,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub review_comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new DUR.
#[derive(Debug, Deserialize)]
pub struct CreateDur {
    pub document_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub proposed_content: String,
}

/// Request body for approving or rejecting a DUR.
#[derive(Debug, Deserialize)]
pub struct ReviewDur {
    pub review_comment: Option<String>,
}

/// Outcome of a review transition attempted inside the workflow
/// transaction. `NotOpen` carries the status the row actually had under
/// lock, so the caller can report the state-machine violation precisely.
#[derive(Debug)]
pub enum ReviewOutcome {
    Reviewed(Dur),
    NotOpen { status: String },
}

/// A row from the `dur_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DurComment {
    pub id: DbId,
    pub dur_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for adding a comment to a DUR.
#[derive(Debug, Deserialize)]
pub struct CreateDurComment {
    pub content: String,
}
