// =============
// crates/core/src/auth/backend.rs
// =============
//! The credential service the auth flow talks to.
use async_trait::async_trait;
use moodlog_common::Account;
use thiserror::Error;

/// Failures reported by a credential service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("invalid email")]
    InvalidEmail,

    #[error("user not found")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("weak password")]
    WeakPassword,

    #[error("too many requests")]
    TooManyRequests,

    #[error("user disabled")]
    UserDisabled,

    #[error("no signed-in user")]
    NotSignedIn,

    #[error("credential service error: {0}")]
    Other(String),
}

impl AuthFailure {
    /// Sentence shown to the end user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthFailure::EmailAlreadyInUse => {
                "That email is already registered. Try signing in instead."
            },
            AuthFailure::InvalidEmail => "Please enter a valid email address.",
            AuthFailure::UserNotFound => "No account found with that email.",
            AuthFailure::WrongPassword => "Incorrect password. Please try again.",
            AuthFailure::WeakPassword => "Password must be at least six characters long.",
            AuthFailure::TooManyRequests => "Too many attempts. Please wait a moment and try again.",
            AuthFailure::UserDisabled => {
                "This account has been disabled. Contact support if you need help."
            },
            AuthFailure::NotSignedIn | AuthFailure::Other(_) => {
                "Something went wrong. Please try again."
            },
        }
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthFailure>;
    async fn update_display_name(&self, uid: &str, name: &str) -> Result<(), AuthFailure>;
    async fn send_email_verification(&self, uid: &str) -> Result<(), AuthFailure>;
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthFailure>;
    async fn sign_out(&self) -> Result<(), AuthFailure>;
}
