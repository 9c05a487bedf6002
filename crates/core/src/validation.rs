//! Field validation rules for YaMDb entities.
//!
//! Each function returns [`CoreError::Validation`] with a message naming the
//! offending field. The database schema repeats the score range as a `CHECK`
//! constraint; that constraint is the authoritative one.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Lowest accepted review score.
pub const MIN_SCORE: i32 = 1;

/// Highest accepted review score.
pub const MAX_SCORE: i32 = 10;

/// Maximum length for category, genre and title names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for category and genre slugs.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Maximum length for a title description.
pub const MAX_DESCRIPTION_LENGTH: usize = 510;

/// Maximum length for usernames and first/last names.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Username that addresses the caller's own profile and can never be registered.
pub const RESERVED_USERNAME: &str = "me";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+\z").expect("valid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+\z").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+\z").expect("valid regex"));

/* --------------------------------------------------------------------------
Reviews
-------------------------------------------------------------------------- */

/// Validate that a review score lies in `[MIN_SCORE, MAX_SCORE]`.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "score: must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate that review or comment text is not blank.
pub fn validate_text(field: &str, text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field}: must not be empty")));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Catalog
-------------------------------------------------------------------------- */

/// Validate a release year against the current UTC year.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    validate_year_not_after(year, chrono::Utc::now().year())
}

/// Validate that `year` does not exceed `current_year`.
pub fn validate_year_not_after(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year > current_year {
        return Err(CoreError::Validation(format!(
            "year: release year {year} is in the future"
        )));
    }
    Ok(())
}

/// Validate a non-empty name of at most `max` characters.
pub fn validate_name(field: &str, name: &str, max: usize) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field}: must not be empty")));
    }
    if name.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field}: exceeds maximum length of {max} characters"
        )));
    }
    Ok(())
}

/// Validate a category or genre slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "slug: exceeds maximum length of {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "slug: '{slug}' may only contain letters, digits, hyphens and underscores"
        )));
    }
    Ok(())
}

/// Validate an optional title description.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(CoreError::Validation(
            format!("description: exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/* --------------------------------------------------------------------------
Users
-------------------------------------------------------------------------- */

/// Validate a username: allowed characters, length, and not the reserved `me`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username == RESERVED_USERNAME {
        return Err(CoreError::Validation(format!(
            "username: '{RESERVED_USERNAME}' is reserved"
        )));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "username: exceeds maximum length of {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(format!(
            "username: '{username}' may only contain letters, digits and @/./+/-/_"
        )));
    }
    Ok(())
}

/// Validate an email address shape and length.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "email: exceeds maximum length of {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation(format!(
            "email: '{email}' is not a valid address"
        )));
    }
    Ok(())
}

/// Validate an optional first or last name.
pub fn validate_person_name(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > MAX_USERNAME_LENGTH => Err(CoreError::Validation(format!(
            "{field}: exceeds maximum length of {MAX_USERNAME_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds_are_inclusive() {
        assert!(validate_score(MIN_SCORE).is_ok());
        assert!(validate_score(MAX_SCORE).is_ok());
        assert!(validate_score(5).is_ok());
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        for score in [0, 11, -1, 100] {
            let err = validate_score(score).unwrap_err();
            assert!(err.to_string().contains("score"));
        }
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(validate_text("text", "Great film").is_ok());
        assert!(validate_text("text", "   ").is_err());
        assert!(validate_text("text", "").is_err());
    }

    #[test]
    fn test_future_year_rejected() {
        assert!(validate_year_not_after(2020, 2026).is_ok());
        assert!(validate_year_not_after(2026, 2026).is_ok());
        let err = validate_year_not_after(2027, 2026).unwrap_err();
        assert!(err.to_string().contains("in the future"));
    }

    #[test]
    fn test_ancient_years_allowed() {
        assert!(validate_year_not_after(-800, 2026).is_ok());
        assert!(validate_year(1869).is_ok());
    }

    #[test]
    fn test_name_length_and_blankness() {
        assert!(validate_name("name", "Books", MAX_NAME_LENGTH).is_ok());
        assert!(validate_name("name", " ", MAX_NAME_LENGTH).is_err());
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name("name", &long, MAX_NAME_LENGTH).is_err());
    }

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("sci-fi_2").is_ok());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("ünïcode").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_description_limit() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("short")).is_ok());
        let long = "d".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(validate_description(Some(&long)).is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("reader.one+test@x-y_z").is_ok());
        assert!(validate_username("me").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("reader@localhost").is_err());
    }

    #[test]
    fn test_person_name_limit() {
        assert!(validate_person_name("first_name", None).is_ok());
        assert!(validate_person_name("first_name", Some("Ada")).is_ok());
        let long = "n".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(validate_person_name("last_name", Some(&long)).is_err());
    }
}
