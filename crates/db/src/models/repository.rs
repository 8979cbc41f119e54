//! Repository and membership entity models and DTOs.

use dochub_core::access::RepoRole;
use dochub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `repositories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Repository {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new repository.
#[derive(Debug, Deserialize)]
pub struct CreateRepository {
    pub name: String,
    /// Auto-generated from name if `None`.
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

/// DTO for updating an existing repository. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateRepository {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// A row from the `repository_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub repo_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

/// A membership row joined with the member's username, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithUser {
    pub repo_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for adding or updating a repository member.
#[derive(Debug, Deserialize)]
pub struct AddMember {
    pub user_id: DbId,
    #[serde(default = "default_member_role")]
    pub role: RepoRole,
}

fn default_member_role() -> RepoRole {
    RepoRole::Viewer
}
