pub mod auth;
pub mod health;
pub mod repos;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user (requires auth)
///
/// /users                                           list (global admin)
/// /users/{id}                                      get (requires auth)
///
/// /repos                                           list, create
/// /repos/{slug}                                    get, update, delete
/// /repos/{slug}/members                            list, add
/// /repos/{slug}/members/{user_id}                  remove
///
/// /repos/{slug}/docs                               list, create
/// /repos/{slug}/docs/{doc_slug}                    get, update, delete
/// /repos/{slug}/docs/{doc_slug}/versions           version history
/// /repos/{slug}/docs/{doc_slug}/versions/{n}       single version
///
/// /repos/{slug}/durs                               list, create
/// /repos/{slug}/durs/{id}                          get
/// /repos/{slug}/durs/{id}/approve                  approve & merge
/// /repos/{slug}/durs/{id}/reject                   reject
/// /repos/{slug}/durs/{id}/comments                 list, add
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/repos", repos::router())
}
