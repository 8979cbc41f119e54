//! Document validation rules and version commit messages.

use crate::error::CoreError;

/// Maximum length for a document title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for a version commit message.
pub const MAX_COMMIT_MESSAGE_LENGTH: usize = 500;

/// Maximum length for document content.
pub const MAX_CONTENT_LENGTH: usize = 1_000_000;

/// Commit message recorded on a document's first version.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial version";

/// Validate a document title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate document content length.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an explicit commit message.
pub fn validate_commit_message(message: &str) -> Result<(), CoreError> {
    if message.len() > MAX_COMMIT_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Commit message must be at most {MAX_COMMIT_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Default commit message for a content update producing version `n`.
pub fn default_commit_message(version_number: i32) -> String {
    format!("Update version {version_number}")
}
