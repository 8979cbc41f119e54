//! Handlers for Document Update Requests, nested under
//! `/repos/{slug}/durs`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use dochub_core::access::RepoRole;
use dochub_core::error::CoreError;
use dochub_core::types::DbId;
use dochub_core::{document, review};
use dochub_db::models::dur::{CreateDur, CreateDurComment, Dur, ReviewDur, ReviewOutcome};
use dochub_db::repositories::{DocumentRepo, DurCommentRepo, DurRepo};
use sqlx::PgPool;

use crate::access::{fetch_repo, require_repo_role, resolve_repo_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query param types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListDursParams {
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a DUR by id within a repository or return 404.
async fn fetch_dur(pool: &PgPool, repo_id: DbId, dur_id: DbId) -> AppResult<Dur> {
    DurRepo::find_in_repo(pool, repo_id, dur_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("DUR", dur_id)))
}

/// Map a review outcome to a response, surfacing the state-machine
/// violation when the DUR was already closed.
fn unpack_outcome(outcome: Option<ReviewOutcome>, dur_id: DbId) -> AppResult<Dur> {
    match outcome {
        None => Err(AppError::Core(CoreError::not_found("DUR", dur_id))),
        Some(ReviewOutcome::NotOpen { status }) => Err(AppError::Core(
            CoreError::InvalidState(format!("DUR is not open (status: {status})")),
        )),
        Some(ReviewOutcome::Reviewed(dur)) => Ok(dur),
    }
}

// ---------------------------------------------------------------------------
// DUR lifecycle
// ---------------------------------------------------------------------------

/// GET /repos/{slug}/durs?status=
///
/// List a repository's DURs, newest first, optionally filtered by status.
pub async fn list_durs(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
    Query(params): Query<ListDursParams>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    if let Some(ref status) = params.status {
        review::validate_status(status).map_err(AppError::Core)?;
    }

    let durs = DurRepo::list_by_repo(&state.pool, repo.id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: durs }))
}

/// POST /repos/{slug}/durs
///
/// Open a DUR proposing new content for a document. Requires any
/// resolvable access (including public read-only) by an authenticated
/// caller.
pub async fn create_dur(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(repo_slug): Path<String>,
    Json(input): Json<CreateDur>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, Some(auth.principal())).await?;

    document::validate_title(&input.title).map_err(AppError::Core)?;
    document::validate_content(&input.proposed_content).map_err(AppError::Core)?;

    // The target document must exist and belong to this repository.
    let doc = DocumentRepo::find_by_id(&state.pool, input.document_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Document", input.document_id)))?;
    if doc.repo_id != repo.id {
        return Err(AppError::Core(CoreError::Conflict(
            "Document does not belong to this repository".into(),
        )));
    }

    let dur = DurRepo::create(&state.pool, repo.id, &input, auth.user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        dur_id = dur.id,
        document_id = doc.id,
        "DUR opened"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: dur })))
}

/// GET /repos/{slug}/durs/{dur_id}
///
/// Fetch a single DUR.
pub async fn get_dur(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path((repo_slug, dur_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let dur = fetch_dur(&state.pool, repo.id, dur_id).await?;
    Ok(Json(DataResponse { data: dur }))
}

/// POST /repos/{slug}/durs/{dur_id}/approve
///
/// Merge the DUR's proposed content into the document and close the DUR,
/// atomically. Requires editor.
pub async fn approve_dur(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, dur_id)): Path<(String, DbId)>,
    Json(input): Json<ReviewDur>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Editor).await?;

    if let Some(ref comment) = input.review_comment {
        review::validate_review_comment(comment).map_err(AppError::Core)?;
    }

    let outcome = DurRepo::approve(
        &state.pool,
        repo.id,
        dur_id,
        auth.user_id,
        input.review_comment.as_deref(),
    )
    .await?;
    let dur = unpack_outcome(outcome, dur_id)?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        dur_id = dur.id,
        document_id = dur.document_id,
        "DUR merged"
    );

    Ok(Json(DataResponse { data: dur }))
}

/// POST /repos/{slug}/durs/{dur_id}/reject
///
/// Close the DUR without merging. Requires editor.
pub async fn reject_dur(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, dur_id)): Path<(String, DbId)>,
    Json(input): Json<ReviewDur>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    require_repo_role(&state.pool, &repo, auth.principal(), RepoRole::Editor).await?;

    if let Some(ref comment) = input.review_comment {
        review::validate_review_comment(comment).map_err(AppError::Core)?;
    }

    let outcome = DurRepo::reject(
        &state.pool,
        repo.id,
        dur_id,
        auth.user_id,
        input.review_comment.as_deref(),
    )
    .await?;
    let dur = unpack_outcome(outcome, dur_id)?;

    tracing::info!(
        user_id = auth.user_id,
        repo_id = repo.id,
        dur_id = dur.id,
        "DUR rejected"
    );

    Ok(Json(DataResponse { data: dur }))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /repos/{slug}/durs/{dur_id}/comments
///
/// List a DUR's comments, oldest first.
pub async fn list_comments(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path((repo_slug, dur_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, auth.principal()).await?;

    let dur = fetch_dur(&state.pool, repo.id, dur_id).await?;
    let comments = DurCommentRepo::list_by_dur(&state.pool, dur.id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /repos/{slug}/durs/{dur_id}/comments
///
/// Append a comment. Allowed in any DUR state, including after close.
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((repo_slug, dur_id)): Path<(String, DbId)>,
    Json(input): Json<CreateDurComment>,
) -> AppResult<impl IntoResponse> {
    let repo = fetch_repo(&state.pool, &repo_slug).await?;
    resolve_repo_access(&state.pool, &repo, Some(auth.principal())).await?;

    review::validate_comment_content(&input.content).map_err(AppError::Core)?;

    let dur = fetch_dur(&state.pool, repo.id, dur_id).await?;
    let comment = DurCommentRepo::create(&state.pool, dur.id, auth.user_id, &input.content).await?;

    tracing::info!(
        user_id = auth.user_id,
        dur_id = dur.id,
        comment_id = comment.id,
        "DUR comment added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
