//! Route definitions for repositories and their nested resources
//! (documents, versions, DURs, comments).

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{documents, durs, repos};
use crate::state::AppState;

/// Routes mounted at `/repos`.
///
/// ```text
/// GET    /                                       list_repos
/// POST   /                                       create_repo
/// GET    /{slug}                                 get_repo
/// PUT    /{slug}                                 update_repo
/// DELETE /{slug}                                 delete_repo
/// GET    /{slug}/members                         list_members
/// POST   /{slug}/members                         add_member
/// DELETE /{slug}/members/{user_id}               remove_member
/// GET    /{slug}/docs                            list_docs
/// POST   /{slug}/docs                            create_doc
/// GET    /{slug}/docs/{doc_slug}                 get_doc
/// PUT    /{slug}/docs/{doc_slug}                 update_doc
/// DELETE /{slug}/docs/{doc_slug}                 delete_doc
/// GET    /{slug}/docs/{doc_slug}/versions        list_versions
/// GET    /{slug}/docs/{doc_slug}/versions/{n}    get_version
/// GET    /{slug}/durs                            list_durs
/// POST   /{slug}/durs                            create_dur
/// GET    /{slug}/durs/{dur_id}                   get_dur
/// POST   /{slug}/durs/{dur_id}/approve           approve_dur
/// POST   /{slug}/durs/{dur_id}/reject            reject_dur
/// GET    /{slug}/durs/{dur_id}/comments          list_comments
/// POST   /{slug}/durs/{dur_id}/comments          add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(repos::list_repos).post(repos::create_repo))
        .route(
            "/{slug}",
            get(repos::get_repo)
                .put(repos::update_repo)
                .delete(repos::delete_repo),
        )
        .route(
            "/{slug}/members",
            get(repos::list_members).post(repos::add_member),
        )
        .route("/{slug}/members/{user_id}", delete(repos::remove_member))
        .route(
            "/{slug}/docs",
            get(documents::list_docs).post(documents::create_doc),
        )
        .route(
            "/{slug}/docs/{doc_slug}",
            get(documents::get_doc)
                .put(documents::update_doc)
                .delete(documents::delete_doc),
        )
        .route(
            "/{slug}/docs/{doc_slug}/versions",
            get(documents::list_versions),
        )
        .route(
            "/{slug}/docs/{doc_slug}/versions/{version_number}",
            get(documents::get_version),
        )
        .route("/{slug}/durs", get(durs::list_durs).post(durs::create_dur))
        .route("/{slug}/durs/{dur_id}", get(durs::get_dur))
        .route("/{slug}/durs/{dur_id}/approve", post(durs::approve_dur))
        .route("/{slug}/durs/{dur_id}/reject", post(durs::reject_dur))
        .route(
            "/{slug}/durs/{dur_id}/comments",
            get(durs::list_comments).post(durs::add_comment),
        )
}
