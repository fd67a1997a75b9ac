//! Slug generation and validation for art piece URLs.
//!
//! Public piece URLs have the form `/art/{type}/{slug}`. Slugs are derived
//! from the piece title and must stay unique per art type; uniqueness itself
//! lives in the repository layer (it needs the table), this module only
//! provides the pure string mechanics.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum slug length in characters.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Route words that may never become piece slugs. A piece slugged `edit`
/// would shadow the admin routes that share the URL space.
pub const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "art", "health", "static", "new", "edit", "trash",
];

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Generate a URL-safe slug from a piece title.
///
/// Converts to lowercase, replaces spaces and special characters with
/// hyphens, collapses consecutive hyphens, trims leading/trailing hyphens,
/// and truncates to [`MAX_SLUG_LENGTH`]. A title with no ASCII alphanumeric
/// characters produces an empty string, which [`validate_slug`] rejects.
pub fn generate_slug(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '-'
            }
        })
        .collect();

    // Collapse consecutive hyphens.
    let mut result = String::with_capacity(slug.len());
    let mut prev_hyphen = false;
    for c in slug.chars() {
        if c == '-' {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    // Trim leading/trailing hyphens and cap the length. The slug is pure
    // ASCII at this point, so byte indexing is safe.
    let mut trimmed = result.trim_matches('-');
    if trimmed.len() > MAX_SLUG_LENGTH {
        trimmed = trimmed[..MAX_SLUG_LENGTH].trim_end_matches('-');
    }
    trimmed.to_string()
}

/// Append a numeric suffix to a base slug: `numbered_slug("orbit", 2)` is
/// `"orbit-2"`. The base is shortened if needed so the result never exceeds
/// [`MAX_SLUG_LENGTH`]. Used by the uniqueness walk when a slug is taken.
pub fn numbered_slug(base: &str, n: u32) -> String {
    let suffix = format!("-{n}");
    let keep = MAX_SLUG_LENGTH.saturating_sub(suffix.len());
    let head = if base.len() > keep {
        base[..keep].trim_end_matches('-')
    } else {
        base
    };
    format!("{head}{suffix}")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a piece slug.
///
/// Non-empty, at most [`MAX_SLUG_LENGTH`] characters, only lowercase
/// alphanumeric characters and hyphens, and not a reserved route word.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
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
    if RESERVED_SLUGS.contains(&slug) {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' is reserved"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- generate_slug -------------------------------------------------------

    #[test]
    fn slug_basic_title() {
        assert_eq!(generate_slug("Spinning Torus"), "spinning-torus");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(
            generate_slug("Orbit #3 (night mode!)"),
            "orbit-3-night-mode"
        );
    }

    #[test]
    fn slug_collapses_consecutive_hyphens() {
        assert_eq!(generate_slug("foo---bar"), "foo-bar");
    }

    #[test]
    fn slug_trims_leading_trailing_hyphens() {
        assert_eq!(generate_slug("--hello--"), "hello");
    }

    #[test]
    fn slug_of_symbols_only_is_empty() {
        assert_eq!(generate_slug("!!! ???"), "");
    }

    #[test]
    fn slug_of_long_title_is_capped() {
        let title = "word ".repeat(60);
        let slug = generate_slug(&title);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
        assert!(validate_slug(&slug).is_ok());
    }

    // -- numbered_slug -------------------------------------------------------

    #[test]
    fn numbered_slug_appends_suffix() {
        assert_eq!(numbered_slug("orbit", 2), "orbit-2");
        assert_eq!(numbered_slug("orbit", 13), "orbit-13");
    }

    #[test]
    fn numbered_slug_stays_within_max_length() {
        let base = "b".repeat(MAX_SLUG_LENGTH);
        let slug = numbered_slug(&base, 42);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(slug.ends_with("-42"));
    }

    // -- validate_slug -------------------------------------------------------

    #[test]
    fn slug_valid() {
        assert!(validate_slug("spinning-torus").is_ok());
        assert!(validate_slug("orbit-2").is_ok());
    }

    #[test]
    fn slug_empty_rejected() {
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn slug_uppercase_rejected() {
        assert!(validate_slug("Spinning-Torus").is_err());
    }

    #[test]
    fn slug_too_long_rejected() {
        let long = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_slug(&long).is_err());
    }

    #[test]
    fn reserved_slugs_rejected() {
        for reserved in RESERVED_SLUGS {
            assert!(validate_slug(reserved).is_err(), "'{reserved}' should be reserved");
        }
    }

    #[test]
    fn reserved_word_with_suffix_allowed() {
        assert!(validate_slug("art-of-noise").is_ok());
    }
}
