// ============================
// crates/core/src/validation/mod.rs
// ============================
//! Input validation and sanitization for user-supplied fields.
//!
//! Every `validate_*` function is pure: it returns a [`ValidationResult`]
//! describing the outcome and never fails. [`sanitize_text`] is the one
//! exception, it returns [`ValidationError::TooLong`] when the cleaned text
//! does not fit the field.
//!
//! Oversize input is handled per field:
//! - display names are truncated to [`NAME_MAX_LENGTH`] and flagged invalid;
//! - entry text and prompts are rejected outright.

use moodlog_common::{PasswordStrength, ValidationResult};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Canonical display-name limit. Narrower limits are a presentation concern.
pub const NAME_MAX_LENGTH: usize = 50;
pub const ENTRY_MAX_LENGTH: usize = 500;
pub const PROMPT_MAX_LENGTH: usize = 200;
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Passwords at least this long grade as strong without a special character
pub const STRONG_PASSWORD_LENGTH: usize = 12;

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 '\-]+$").unwrap());
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text is too long (max {max} characters, got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid entry date: {0}")]
    InvalidDate(String),
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Remove tag-like substrings and escape whatever markup characters remain.
fn strip_markup(raw: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(raw, "");
    html_escape::encode_text(&without_tags).into_owned()
}

/// Escaped prefix of `raw` at most `max_len` chars long.
///
/// Escaping happens per character, so an entity is either kept whole or
/// dropped along with everything after it.
fn clamp_markup(raw: &str, max_len: usize) -> String {
    let without_tags = TAG_REGEX.replace_all(raw, "");
    let mut clamped = String::new();
    let mut len = 0;
    let mut buf = [0u8; 4];
    for c in without_tags.chars() {
        let escaped = html_escape::encode_text(c.encode_utf8(&mut buf));
        let width = char_len(&escaped);
        if len + width > max_len {
            break;
        }
        clamped.push_str(&escaped);
        len += width;
    }
    clamped
}

/// Sanitize free text so it renders as plain content.
///
/// Empty input yields an empty string. The length check runs on the
/// sanitized output, so escaped entities count towards `max_len`.
pub fn sanitize_text(raw: &str, max_len: usize) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let sanitized = strip_markup(raw);
    let actual = char_len(&sanitized);
    if actual > max_len {
        return Err(ValidationError::TooLong {
            max: max_len,
            actual,
        });
    }

    Ok(sanitized)
}

/// Validate and sanitize a display name
pub fn validate_name(raw: &str) -> ValidationResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid("Name is required").with_sanitized("");
    }

    let sanitized = strip_markup(trimmed);

    if char_len(&sanitized) > NAME_MAX_LENGTH {
        let clamped = clamp_markup(trimmed, NAME_MAX_LENGTH);
        return ValidationResult::invalid(format!(
            "Name must be {NAME_MAX_LENGTH} characters or fewer"
        ))
        .with_sanitized(clamped);
    }

    // Input consisting only of tags sanitizes to nothing
    if sanitized.is_empty() {
        return ValidationResult::invalid("Name must be at least 1 character").with_sanitized("");
    }

    if !NAME_REGEX.is_match(&sanitized) {
        return ValidationResult::invalid("Name contains invalid characters")
            .with_sanitized(sanitized);
    }

    ValidationResult::valid().with_sanitized(sanitized)
}

/// Trim and lowercase an email address. This is also the rate-limit key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate the shape of an email address (syntax only, no deliverability)
pub fn validate_email(raw: &str) -> ValidationResult {
    let normalized = normalize_email(raw);
    if normalized.is_empty() {
        return ValidationResult::invalid("Email is required");
    }

    if !EMAIL_REGEX.is_match(&normalized) {
        return ValidationResult::invalid("Please enter a valid email address");
    }

    ValidationResult::valid()
}

/// Validate a password and grade its strength.
///
/// Only the first failing rule is reported.
pub fn validate_password(raw: &str) -> ValidationResult {
    if raw.is_empty() {
        return ValidationResult::invalid("Password is required")
            .with_strength(PasswordStrength::None);
    }

    let len = char_len(raw);
    if len < MIN_PASSWORD_LENGTH {
        return ValidationResult::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ))
        .with_strength(PasswordStrength::Weak);
    }

    let has_uppercase = raw.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = raw.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    let has_special = raw.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if !(has_uppercase && has_lowercase && has_digit) {
        return ValidationResult::invalid(
            "Password must include uppercase, lowercase, and a number",
        )
        .with_strength(PasswordStrength::Medium);
    }

    let strength = if len < STRONG_PASSWORD_LENGTH && !has_special {
        PasswordStrength::Good
    } else {
        PasswordStrength::Strong
    };

    ValidationResult::valid().with_strength(strength)
}
