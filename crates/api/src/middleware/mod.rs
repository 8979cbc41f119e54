//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT
//!   Bearer token.
//! - [`auth::OptionalAuthUser`] -- Same, but tolerates anonymous callers
//!   (public-repository reads).
//! - [`rbac::RequireGlobalAdmin`] -- Requires the global admin flag.
//!
//! Per-repository roles depend on the target repository and are resolved
//! in [`crate::access`], not here.

pub mod auth;
pub mod rbac;
