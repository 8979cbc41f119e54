//! Domain kernel for the DocHub documentation platform.
//!
//! This crate holds the pure, I/O-free parts of the system: the role model
//! and access resolution, slug generation, document and review-request
//! validation rules, and the shared error vocabulary. It has no internal
//! dependencies so it can be used by the DB layer, the API layer, and any
//! future CLI tooling alike.

pub mod access;
pub mod document;
pub mod error;
pub mod repository;
pub mod review;
pub mod slug;
pub mod types;
