// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the journaling core and whatever renders it.
//! Everything here serializes to camelCase JSON so a UI layer can consume
//! validation outcomes and rate-limit decisions directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Graded password classification, reported even when the password is rejected
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    None,
    Weak,
    Medium,
    Good,
    Strong,
}

/// Outcome of validating one user-supplied field
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the field passed every check
    pub is_valid: bool,
    /// Human-readable reason, present iff `is_valid` is false
    pub error: Option<String>,
    /// Normalized value safe for storage and display (name fields only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sanitized: Option<String>,
    /// Strength grade (password field only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub strength: Option<PasswordStrength>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            sanitized: None,
            strength: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            sanitized: None,
            strength: None,
        }
    }

    pub fn with_sanitized(mut self, sanitized: impl Into<String>) -> Self {
        self.sanitized = Some(sanitized.into());
        self
    }

    pub fn with_strength(mut self, strength: PasswordStrength) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Borrow the error message, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Answer returned by a rate limiter for a single attempt
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether the attempt may proceed
    pub allowed: bool,
    /// Attempts left in the current window (0 when denied)
    pub remaining_attempts: u32,
    /// When the window clears; only set on denial
    pub reset_time: Option<DateTime<Utc>>,
}

impl RateLimitDecision {
    pub fn allowed(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            remaining_attempts,
            reset_time: None,
        }
    }

    pub fn denied(reset_time: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            remaining_attempts: 0,
            reset_time: Some(reset_time),
        }
    }

    /// Whole minutes until the window clears, rounded up.
    ///
    /// Returns 0 for allowed decisions and for reset times already in the past.
    pub fn retry_after_minutes(&self, now: DateTime<Utc>) -> i64 {
        let Some(reset_time) = self.reset_time else {
            return 0;
        };
        let millis = (reset_time - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        (millis + 59_999) / 60_000
    }
}

/// Account as reported by the credential service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

/// A stored journal entry. The date doubles as the document id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Sanitized entry text
    pub text: String,
    /// Mood marker chosen by the user (an emoji in practice)
    pub mood: String,
    /// Whether the user flagged the day as one that mattered
    pub mattered: bool,
    /// Sanitized writing prompt shown when the entry was written
    pub prompt: String,
    pub user_id: String,
    /// Last write time
    pub timestamp: DateTime<Utc>,
    /// When the entry was first written
    pub created_at: DateTime<Utc>,
}

/// Raw entry as submitted by the user, before sanitization
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryDraft {
    pub date: String,
    pub text: String,
    pub mood: String,
    pub mattered: bool,
    pub prompt: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Counts from a bulk import of locally cached entries
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub success: usize,
    pub errors: usize,
}
