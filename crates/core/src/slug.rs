//! URL-safe slug generation and uniqueness candidates.
//!
//! `slugify` turns free text into a slug; the repository layer probes the
//! candidate sequence (`base`, `base-1`, `base-2`, ...) against its scope
//! inside the same transaction as the insert, so the check-then-insert
//! pair cannot race.

use rand::Rng;

use crate::error::CoreError;

/// Number of numbered candidates to try before falling back to a random
/// suffix. Bounds the probe loop under adversarial input.
pub const MAX_SLUG_PROBES: u32 = 50;

/// Maximum length accepted for an explicitly supplied slug.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Generate a URL-safe slug from free text.
///
/// Lowercases, strips characters that are not alphanumeric, underscore,
/// whitespace, or hyphen, collapses runs of whitespace/underscore/hyphen
/// into single hyphens, and trims leading/trailing hyphens. May return an
/// empty string for input with no alphanumeric characters; callers must
/// reject that before persisting.
pub fn slugify(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    let mut result = String::with_capacity(stripped.len());
    let mut prev_hyphen = false;
    for c in stripped.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_matches('-').to_string()
}

/// Validate an explicitly supplied slug (non-empty, bounded, lowercase
/// alphanumeric and hyphens only).
pub fn validate(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// The nth numbered uniqueness candidate for a base slug.
///
/// `numbered_candidate("x", 0)` is `"x"` itself; subsequent probes yield
/// `"x-1"`, `"x-2"`, ...
pub fn numbered_candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// Fallback candidate once numbered probing is exhausted: the base slug
/// with an 8-character random hex suffix.
pub fn random_candidate(base: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..8)
        .map(|_| char::from_digit(rng.random_range(0..16u32), 16).unwrap())
        .collect();
    format!("{base}-{suffix}")
}
