//! Repository access resolution.
//!
//! Computes a principal's effective role on a repository from the
//! repository's visibility, ownership, the principal's global-admin flag,
//! and an explicit membership record. The resolution is a pure function of
//! those inputs; the API layer supplies the membership row.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// An authenticated principal as supplied by the identity layer.
///
/// The core trusts these fields verbatim; token validation and user lookup
/// happen upstream.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: DbId,
    pub is_admin: bool,
}

/// Explicit membership role on a repository.
///
/// The three levels are strictly ordered: `Viewer < Editor < Admin`.
/// "No role" (public read-only access) is deliberately *not* a variant --
/// it is modeled as `None` in [`resolve_access`]'s return type so it can
/// never satisfy a minimum-role check by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoRole {
    Viewer,
    Editor,
    Admin,
}

impl RepoRole {
    /// The database representation of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            RepoRole::Viewer => "viewer",
            RepoRole::Editor => "editor",
            RepoRole::Admin => "admin",
        }
    }

    /// Parse a role from its database representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "viewer" => Ok(RepoRole::Viewer),
            "editor" => Ok(RepoRole::Editor),
            "admin" => Ok(RepoRole::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: viewer, editor, admin"
            ))),
        }
    }
}

impl std::fmt::Display for RepoRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a principal's effective role on a repository.
///
/// Returns `Some(role)` for owners, global admins, and explicit members,
/// and `None` for read-only access to a public repository (anonymous or
/// authenticated non-member). Fails with [`CoreError::Unauthenticated`]
/// when an anonymous caller hits a private repository and with
/// [`CoreError::Forbidden`] when an authenticated non-member does.
pub fn resolve_access(
    repo_is_public: bool,
    repo_owner_id: DbId,
    principal: Option<Principal>,
    membership: Option<RepoRole>,
) -> Result<Option<RepoRole>, CoreError> {
    let Some(principal) = principal else {
        if repo_is_public {
            return Ok(None);
        }
        return Err(CoreError::Unauthenticated(
            "Authentication required".into(),
        ));
    };

    if principal.user_id == repo_owner_id || principal.is_admin {
        return Ok(Some(RepoRole::Admin));
    }

    if let Some(role) = membership {
        return Ok(Some(role));
    }

    if repo_is_public {
        // Authenticated but not a member: read-only.
        return Ok(None);
    }

    Err(CoreError::Forbidden("Access denied".into()))
}

/// Require at minimum a certain role, returning the actual role.
///
/// `None` (public read-only) never satisfies any minimum, including
/// `Viewer`.
pub fn require_role(
    access: Option<RepoRole>,
    min_role: RepoRole,
) -> Result<RepoRole, CoreError> {
    match access {
        Some(role) if role >= min_role => Ok(role),
        _ => Err(CoreError::Forbidden("Insufficient permissions".into())),
    }
}
