// ==============================
// tests/unit/validation_tests.rs
// ==============================
//! Validators exercised with the inputs a sign-up form and journal page send
use moodlog_common::{PasswordStrength, ValidationResult};
use moodlog_core::validation::{
    sanitize_text, validate_email, validate_name, validate_password, ValidationError,
    ENTRY_MAX_LENGTH, NAME_MAX_LENGTH, PROMPT_MAX_LENGTH,
};

fn assert_invalid_with(result: &ValidationResult, message: &str) {
    assert!(!result.is_valid, "expected invalid result for {message:?}");
    assert_eq!(result.error_message(), Some(message));
}

#[test]
fn test_sanitized_text_never_contains_raw_angle_brackets() {
    let inputs = [
        "<b>hello</b>",
        "<<script>>",
        "a < b > c",
        "<img src=x onerror=alert(1)>",
        "3 <4",
        "unclosed <div",
        "<p>nested <i>tags</i></p>",
    ];

    for input in inputs {
        let sanitized = sanitize_text(input, ENTRY_MAX_LENGTH).expect("fits");
        assert!(!sanitized.contains('<'), "{input:?} -> {sanitized:?}");
        assert!(!sanitized.contains('>'), "{input:?} -> {sanitized:?}");
    }
}

#[test]
fn test_sanitize_preserves_plain_text_and_unicode() {
    let text = "Today felt calm 😌, walked by the river with Zoë.";
    assert_eq!(sanitize_text(text, ENTRY_MAX_LENGTH).unwrap(), text);
}

#[test]
fn test_sanitize_length_counts_escaped_characters() {
    // Each '&' becomes "&amp;", five characters
    let ampersands = "&".repeat(100);
    assert_eq!(
        sanitize_text(&ampersands, PROMPT_MAX_LENGTH),
        Err(ValidationError::TooLong {
            max: PROMPT_MAX_LENGTH,
            actual: 500
        })
    );
    assert!(sanitize_text(&ampersands, ENTRY_MAX_LENGTH).is_ok());
}

#[test]
fn test_sanitize_exact_limit_is_accepted() {
    let exact = "é".repeat(PROMPT_MAX_LENGTH);
    assert_eq!(sanitize_text(&exact, PROMPT_MAX_LENGTH).unwrap(), exact);
}

#[test]
fn test_name_truncation_reports_clamped_value() {
    let long = "b".repeat(NAME_MAX_LENGTH * 2);
    let result = validate_name(&long);

    assert_invalid_with(&result, "Name must be 50 characters or fewer");
    assert_eq!(
        result.sanitized.as_deref().map(|s| s.chars().count()),
        Some(NAME_MAX_LENGTH)
    );
}

#[test]
fn test_name_character_set() {
    for ok in ["Jane", "Mary-Kate O'Neil", "R2 D2"] {
        assert!(validate_name(ok).is_valid, "{ok:?} should be valid");
    }
    for bad in ["Zoë", "jane@home", "tab\tname", "semi;colon"] {
        assert_invalid_with(&validate_name(bad), "Name contains invalid characters");
    }
}

#[test]
fn test_email_validation_messages() {
    assert_invalid_with(&validate_email(""), "Email is required");
    assert_invalid_with(&validate_email("jane"), "Please enter a valid email address");
    assert_invalid_with(
        &validate_email("jane@localhost"),
        "Please enter a valid email address",
    );
    assert!(validate_email(" Jane.Doe+journal@Example.org ").is_valid);
}

#[test]
fn test_password_strength_ladder() {
    let cases = [
        ("", false, PasswordStrength::None),
        ("Ab1", false, PasswordStrength::Weak),
        ("alllowercase1", false, PasswordStrength::Medium),
        ("ALLUPPERCASE1", false, PasswordStrength::Medium),
        ("NoDigitsHere", false, PasswordStrength::Medium),
        ("Abcdefg1", true, PasswordStrength::Good),
        ("Abcdefg1?", true, PasswordStrength::Strong),
        ("Abcdefghijk1", true, PasswordStrength::Strong),
    ];

    for (password, valid, strength) in cases {
        let result = validate_password(password);
        assert_eq!(result.is_valid, valid, "{password:?}");
        assert_eq!(result.strength, Some(strength), "{password:?}");
    }
}

#[test]
fn test_password_messages() {
    assert_invalid_with(&validate_password(""), "Password is required");
    assert_invalid_with(
        &validate_password("short"),
        "Password must be at least 8 characters long",
    );
    assert_invalid_with(
        &validate_password("longenough"),
        "Password must include uppercase, lowercase, and a number",
    );
}

#[test]
fn test_validation_result_json_shape() {
    let json = serde_json::to_value(validate_password("Abcdefg1")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "isValid": true, "error": null, "strength": "good" })
    );
}
