//! Domain error vocabulary shared by the DB and API layers.

/// Errors produced by domain operations.
///
/// Every failure from a repository or workflow operation is one of these
/// kinds; the API layer maps each to an HTTP status. Store-level faults
/// (lost connection, pool exhaustion) surface as [`CoreError::Unavailable`]
/// and are the only kind a caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The operation requires a known principal and none was supplied.
    #[error("{0}")]
    Unauthenticated(String),

    /// The principal resolved but lacks the required role or ownership.
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness or cross-entity consistency violated.
    #[error("{0}")]
    Conflict(String),

    /// A state-machine precondition does not hold.
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input, rejected before any store interaction.
    #[error("{0}")]
    Validation(String),

    /// The persistent store failed; eligible for caller-side retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl CoreError {
    /// Build a [`CoreError::NotFound`] for the given entity and identifier.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
