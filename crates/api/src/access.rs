//! Repository access checks for handlers.
//!
//! Bridges the HTTP layer to the pure resolver in `dochub_core::access`:
//! fetches the repository and the caller's membership row, then delegates
//! the actual decision. Every handler that touches a repository goes
//! through these helpers before invoking a repository operation.

use dochub_core::access::{self, Principal, RepoRole};
use dochub_core::error::CoreError;
use dochub_db::models::repository::Repository;
use dochub_db::repositories::{MemberRepo, RepositoryRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Fetch a repository by slug or fail with `NotFound`.
pub async fn fetch_repo(pool: &PgPool, slug: &str) -> AppResult<Repository> {
    RepositoryRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Repository", slug)))
}

/// Resolve the caller's effective role on a repository.
///
/// Returns `Some(role)` for owners, global admins, and members; `None`
/// for read-only access to a public repository. Propagates the resolver's
/// `Unauthenticated`/`Forbidden` denials.
pub async fn resolve_repo_access(
    pool: &PgPool,
    repo: &Repository,
    principal: Option<Principal>,
) -> AppResult<Option<RepoRole>> {
    let membership = match principal {
        Some(p) if p.user_id != repo.owner_id && !p.is_admin => {
            match MemberRepo::find(pool, repo.id, p.user_id).await? {
                Some(member) => Some(RepoRole::parse(&member.role).map_err(AppError::Core)?),
                None => None,
            }
        }
        _ => None,
    };

    access::resolve_access(repo.is_public, repo.owner_id, principal, membership)
        .map_err(AppError::Core)
}

/// Require at minimum a certain role on a repository, returning the
/// caller's actual role.
pub async fn require_repo_role(
    pool: &PgPool,
    repo: &Repository,
    principal: Principal,
    min_role: RepoRole,
) -> AppResult<RepoRole> {
    let resolved = resolve_repo_access(pool, repo, Some(principal)).await?;
    access::require_role(resolved, min_role).map_err(AppError::Core)
}
