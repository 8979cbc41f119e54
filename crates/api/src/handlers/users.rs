//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::Json;

use dochub_core::error::CoreError;
use dochub_core::types::DbId;
use dochub_db::models::user::UserResponse;
use dochub_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGlobalAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /users
///
/// List all users. Global admins only.
pub async fn list_users(
    RequireGlobalAdmin(_admin): RequireGlobalAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /users/{id}
///
/// Fetch a single user by id. Any authenticated caller.
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}
