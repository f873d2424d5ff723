// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password hashing
use moodlog_core::auth::{hash_password, verify_password};

#[test]
fn test_password_hashing() {
    let password = "Abcdefg1!";
    let hash = hash_password(password).expect("Failed to hash password");

    // Hash should be different from the original password
    assert_ne!(hash, password);
    assert!(hash.starts_with("$scrypt$"));

    assert!(verify_password(&hash, password));
    assert!(!verify_password(&hash, "wrong_password"));
}

#[test]
fn test_password_hash_uniqueness() {
    let password = "Abcdefg1!";

    let hash1 = hash_password(password).expect("Failed to hash password");
    let hash2 = hash_password(password).expect("Failed to hash password");

    // Hashes should be different due to salt
    assert_ne!(hash1, hash2);
    assert!(verify_password(&hash1, password));
    assert!(verify_password(&hash2, password));
}

#[test]
fn test_malformed_hash_never_verifies() {
    assert!(!verify_password("not-a-phc-string", "anything"));
    assert!(!verify_password("", ""));
}
