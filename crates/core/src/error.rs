// crates/core/src/error.rs

//! Central error type for the collaborator layers.
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::auth::AuthFailure;
use crate::validation::ValidationError;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application error types with error codes and user-facing messages
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthFailure),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded until {reset_time}")]
    RateLimited {
        reset_time: DateTime<Utc>,
        /// Whole minutes until `reset_time`, rounded up
        minutes: i64,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTH_001",
            AppError::Validation(_) => "VAL_001",
            AppError::InvalidInput(_) => "VAL_002",
            AppError::RateLimited { .. } => "RATE_001",
            AppError::Storage(_) => "STORE_001",
            AppError::Config(_) => "CFG_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Whether retrying later can succeed without the user changing anything
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::RateLimited { .. } | AppError::Auth(AuthFailure::TooManyRequests)
        )
    }

    /// Message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(failure) => failure.user_message().to_string(),
            AppError::Validation(ValidationError::TooLong { max, .. }) => {
                format!("Text is too long (max {max} characters)")
            },
            AppError::Validation(err) => err.to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::RateLimited { minutes, .. } => format!(
                "Too many attempts. Please wait {minutes} minute(s) before trying again."
            ),
            AppError::Storage(_)
            | AppError::Config(_)
            | AppError::Json(_)
            | AppError::Internal(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}
