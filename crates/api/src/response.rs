//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope except the auth
//! endpoints, which return their token payload at the top level. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`
//! to get compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
