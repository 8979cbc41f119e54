//! Global role-based access control extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dochub_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the global admin flag. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireGlobalAdmin(user): RequireGlobalAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be a global admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireGlobalAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireGlobalAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin privileges required".into(),
            )));
        }
        Ok(RequireGlobalAdmin(user))
    }
}
