//! Handlers for the `/repos` resource: repository CRUD and membership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use dochub_core::access::RepoRole;
use dochub_core::error::CoreError;
use dochub_core::types::DbId;
use dochub_core::{repository, slug};
use dochub_db::models::repository::{
    AddMember, CreateRepository, MemberWithUser, Repository, UpdateRepository,
};
use dochub_db::repositories::{MemberRepo, RepositoryRepo, UserRepo};

use crate::access::{fetch_repo, require_repo_role, resolve_repo_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A repository together with the caller's effective role on it.
///
/// `effective_role` is `null` for read-only access to a public repository.
#[derive(Debug, Serialize)]
pub struct RepoWithAccess {
    #[serde(flatten)]
    pub repo: Repository,
    pub effective_role: Option<RepoRole>,
}

// ---------------------------------------------------------------------------
// Repository CRUD
// ---------------------------------------------------------------------------

/// GET /repos
///
/// List repositories visible to the caller: public only for anonymous
/// callers, everything for global admins, and public + owned + member-of
/// otherwise.
pub async fn list_repos(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let repos = match auth.0 {
        None => RepositoryRepo::list_public(&state.pool).await?,
        Some(user) if user.is_admin => RepositoryRepo::list_all(&state.pool).await?,
        Some(user) => RepositoryRepo::list_visible_to(&state.pool, user.user_id).await?,
    };
    Ok(Json(DataResponse { data: repos }))
}

/// POST /repos
///
/// Create a repository owned by the caller. The slug is taken from the
/// request when supplied, otherwise generated from the name; either way
/// it is made unique by probing.
pub async fn create_repo(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRepository>,
) -> AppResult<impl IntoResponse> {
    repository::validate_name(&input.name).map_err(AppError::Core)?;
    if let Some(ref description) = input.description {
        repository::validate_description(description).map_err(AppError::Core)?;
    }

    let slug_base = match &input.slug {
        Some(s) => {
            slug::validate(s).map_err(AppError::Core)?;
            s.clone()
        }
        None => slug::slugify(&input.name),
    };
    if slug_base.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Repository name must contain at least one alphanumeric character".into(),
        )));
    }

    let repo = RepositoryRepo::create(&state.pool, &input, &slug_base, auth.user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        slug = %repo.slug,
        "Repository created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: repo })))
}

/// GET /repos/{slug}
///
/// Fetch a repository together with the caller's effective role.
pub async fn get_repo(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    let effective_role = resolve_repo_access(&state.pool, &repo, auth.principal()).await?;
    Ok(Json(DataResponse {
        data: RepoWithAccess {
            repo,
            effective_role,
        },
    }))
}

/// PUT /repos/{slug}
///
/// Update name/description/visibility. Requires repo admin.
pub async fn update_repo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
    Json(input): Json<UpdateRepository>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Admin).await?;

    if let Some(ref name) = input.name {
        repository::validate_name(name).map_err(AppError::Core)?;
    }
    if let Some(ref description) = input.description {
        repository::validate_description(description).map_err(AppError::Core)?;
    }

    let updated = RepositoryRepo::update(&state.pool, repo.id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Repository", &repo_slug)))?;

    tracing::info!(user_id = auth.user_id, repo_id = repo.id, "Repository updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /repos/{slug}
///
/// Delete a repository and everything in it. Stricter than the generic
/// admin gate: only the owner or a global admin may delete.
pub async fn delete_repo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
) -> AppResult<StatusCode> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;

    if repo.owner_id != auth.user_id && !auth.is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner can delete this repository".into(),
        )));
    }

    RepositoryRepo::delete(&state.pool, repo.id).await?;

    tracing::info!(user_id = auth.user_id, repo_id = repo.id, slug = %repo_slug, "Repository deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// GET /repos/{slug}/members
///
/// List members. Requires resolvable access to the repository.
pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<MemberWithUser>>>> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, Some(auth.principal())).await?;

    let members = MemberRepo::list(&state.pool, repo.id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /repos/{slug}/members
///
/// Add a member or overwrite an existing member's role. Requires repo
/// admin.
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
    Json(input): Json<AddMember>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Admin).await?;

    let target = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", input.user_id)))?;

    let member = MemberRepo::upsert(&state.pool, repo.id, target.id, input.role).await?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        member_id = target.id,
        role = %input.role,
        "Repository member set"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// DELETE /repos/{slug}/members/{user_id}
///
/// Remove a member. Requires repo admin.
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, user_id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Admin).await?;

    let removed = MemberRepo::remove(&state.pool, repo.id, user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::not_found("Member", user_id)));
    }

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        member_id = user_id,
        "Repository member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
