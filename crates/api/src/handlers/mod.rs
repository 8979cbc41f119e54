//! HTTP handlers, one module per resource.

pub mod auth;
pub mod documents;
pub mod durs;
pub mod repos;
pub mod users;
