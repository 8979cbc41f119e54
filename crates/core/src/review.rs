//! Document Update Request (DUR) lifecycle rules.
//!
//! A DUR starts `open` and moves to exactly one of the terminal states
//! `merged` or `rejected`; nothing transitions out of a terminal state.
//! The `approved` value is accepted on the wire for compatibility but no
//! workflow transition produces it.

use crate::error::CoreError;

/// DUR is awaiting review.
pub const STATUS_OPEN: &str = "open";

/// Reserved status value; no transition currently produces it.
pub const STATUS_APPROVED: &str = "approved";

/// DUR was rejected by a reviewer. Terminal.
pub const STATUS_REJECTED: &str = "rejected";

/// DUR was approved and its content merged into the document. Terminal.
pub const STATUS_MERGED: &str = "merged";

/// All valid DUR status values.
pub const VALID_STATUSES: &[&str] =
    &[STATUS_OPEN, STATUS_APPROVED, STATUS_REJECTED, STATUS_MERGED];

/// Maximum length for a DUR review comment.
pub const MAX_REVIEW_COMMENT_LENGTH: usize = 10_000;

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid DUR status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Ensure a DUR can still be reviewed (approved or rejected).
///
/// Only `open` DURs are reviewable; both terminal states fail with
/// [`CoreError::InvalidState`].
pub fn ensure_reviewable(status: &str) -> Result<(), CoreError> {
    if status == STATUS_OPEN {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "DUR is not open (status: {status})"
        )))
    }
}

/// Validate an optional review comment.
pub fn validate_review_comment(comment: &str) -> Result<(), CoreError> {
    if comment.len() > MAX_REVIEW_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Review comment must be at most {MAX_REVIEW_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a DUR discussion comment (non-empty, bounded).
pub fn validate_comment_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()));
    }
    if content.len() > MAX_REVIEW_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_REVIEW_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Commit message recorded on the version created by merging a DUR.
pub fn merge_commit_message(dur_title: &str) -> String {
    format!("Merged DUR: {dur_title}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statuses_accepted() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_status("draft").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn open_dur_is_reviewable() {
        assert!(ensure_reviewable(STATUS_OPEN).is_ok());
    }

    #[test]
    fn terminal_states_are_not_reviewable() {
        for status in [STATUS_MERGED, STATUS_REJECTED] {
            let err = ensure_reviewable(status).unwrap_err();
            assert!(matches!(err, CoreError::InvalidState(_)));
        }
    }

    #[test]
    fn merge_commit_message_includes_title() {
        assert_eq!(
            merge_commit_message("Fix typos"),
            "Merged DUR: Fix typos"
        );
    }

    #[test]
    fn empty_comment_rejected() {
        assert!(validate_comment_content("  ").is_err());
    }

    #[test]
    fn oversized_comment_rejected() {
        let long = "c".repeat(MAX_REVIEW_COMMENT_LENGTH + 1);
        assert!(validate_comment_content(&long).is_err());
        assert!(validate_review_comment(&long).is_err());
    }
}
