//! Handlers for documents and their version history, nested under
//! `/repos/{slug}/docs`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use dochub_core::access::RepoRole;
use dochub_core::error::CoreError;
use dochub_core::types::DbId;
use dochub_core::{document, slug};
use dochub_db::models::document::{CreateDocument, Document, UpdateDocument};
use dochub_db::repositories::{DocumentRepo, VersionRepo};
use sqlx::PgPool;

use crate::access::{fetch_repo, require_repo_role, resolve_repo_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a document by slug within a repository or return 404.
async fn fetch_doc(pool: &PgPool, repo_id: DbId, doc_slug: &str) -> AppResult<Document> {
    DocumentRepo::find_by_slug(pool, repo_id, doc_slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Document", doc_slug)))
}

// ---------------------------------------------------------------------------
// Document CRUD
// ---------------------------------------------------------------------------

/// GET /repos/{slug}/docs
///
/// List a repository's documents.
pub async fn list_docs(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let docs = DocumentRepo::list_by_repo(&state.pool, repo.id).await?;
    Ok(Json(DataResponse { data: docs }))
}

/// POST /repos/{slug}/docs
///
/// Create a document (and its first version). Requires editor.
pub async fn create_doc(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Editor).await?;

    document::validate_title(&input.title).map_err(AppError::Core)?;
    document::validate_content(&input.current_content).map_err(AppError::Core)?;

    let slug_base = match &input.slug {
        Some(s) => {
            slug::validate(s).map_err(AppError::Core)?;
            s.clone()
        }
        None => slug::slugify(&input.title),
    };
    if slug_base.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must contain at least one alphanumeric character".into(),
        )));
    }

    let doc = DocumentRepo::create(&state.pool, repo.id, &input, &slug_base, auth.user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        document_id = doc.id,
        slug = %doc.slug,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: doc })))
}

/// GET /repos/{slug}/docs/{doc_slug}
///
/// Fetch a single document.
pub async fn get_doc(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path((repo_slug, doc_slug)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let doc = fetch_doc(&state.pool, repo.id, &doc_slug).await?;
    Ok(Json(DataResponse { data: doc }))
}

/// PUT /repos/{slug}/docs/{doc_slug}
///
/// Update title and/or content. A content change appends a new version.
/// Requires editor.
pub async fn update_doc(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, doc_slug)): Path<(String, String)>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Editor).await?;

    if let Some(ref title) = input.title {
        document::validate_title(title).map_err(AppError::Core)?;
    }
    if let Some(ref content) = input.current_content {
        document::validate_content(content).map_err(AppError::Core)?;
    }
    if let Some(ref message) = input.commit_message {
        document::validate_commit_message(message).map_err(AppError::Core)?;
    }

    let doc = fetch_doc(&state.pool, repo.id, &doc_slug).await?;
    let updated = DocumentRepo::update(&state.pool, doc.id, &input, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Document", &doc_slug)))?;

    tracing::info!(
        user_id = auth.user_id,
        document_id = doc.id,
        content_changed = input.current_content.is_some(),
        "Document updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /repos/{slug}/docs/{doc_slug}
///
/// Delete a document with its versions and DURs. Requires repo admin.
pub async fn delete_doc(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, doc_slug)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Admin).await?;

    let doc = fetch_doc(&state.pool, repo.id, &doc_slug).await?;
    DocumentRepo::delete(&state.pool, doc.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        document_id = doc.id,
        slug = %doc_slug,
        "Document deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Version history
// ---------------------------------------------------------------------------

/// GET /repos/{slug}/docs/{doc_slug}/versions
///
/// List a document's versions, newest first.
pub async fn list_versions(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path((repo_slug, doc_slug)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let doc = fetch_doc(&state.pool, repo.id, &doc_slug).await?;
    let versions = VersionRepo::list_by_document(&state.pool, doc.id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /repos/{slug}/docs/{doc_slug}/versions/{version_number}
///
/// Fetch a single version by number.
pub async fn get_version(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path((repo_slug, doc_slug, version_number)): Path<(String, String, i32)>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let doc = fetch_doc(&state.pool, repo.id, &doc_slug).await?;
    let version = VersionRepo::find_by_document_and_number(&state.pool, doc.id, version_number)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Version", version_number)))?;
    Ok(Json(DataResponse { data: version }))
}
