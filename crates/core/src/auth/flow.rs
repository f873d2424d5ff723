// ============================
// crates/core/src/auth/flow.rs
// ============================
//! Login, sign-up and password reset, guarded by validation and rate limits.
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use moodlog_common::{Account, ValidationResult};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::backend::{AuthBackend, AuthFailure};
use super::rate_limit::RateLimiter;
use crate::error::AppError;
use crate::metrics::{
    AUTH_BACKEND_FAILURE, AUTH_LOGIN_ATTEMPT, AUTH_LOGIN_SUCCESS, AUTH_PASSWORD_RESET,
    AUTH_RATE_LIMITED, AUTH_SIGNUP_SUCCESS,
};
use crate::validation::{normalize_email, validate_email, validate_name, validate_password};

/// Drives the credential service on behalf of the UI.
///
/// Login and sign-up share one limiter keyed by normalized email; password
/// reset emails have their own, stricter one.
pub struct AuthFlow<B> {
    backend: Arc<B>,
    auth_limiter: Arc<RateLimiter>,
    reset_limiter: Arc<RateLimiter>,
}

impl<B> Clone for AuthFlow<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            auth_limiter: Arc::clone(&self.auth_limiter),
            reset_limiter: Arc::clone(&self.reset_limiter),
        }
    }
}

impl<B: AuthBackend> AuthFlow<B> {
    pub fn new(
        backend: Arc<B>,
        auth_limiter: Arc<RateLimiter>,
        reset_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            backend,
            auth_limiter,
            reset_limiter,
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn auth_limiter(&self) -> &Arc<RateLimiter> {
        &self.auth_limiter
    }

    pub fn reset_limiter(&self) -> &Arc<RateLimiter> {
        &self.reset_limiter
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AppError> {
        ensure_valid(validate_email(email))?;
        let email = normalize_email(email);

        let password = Zeroizing::new(password.trim().to_owned());
        if password.is_empty() {
            return Err(AppError::InvalidInput(
                "Enter your password to continue.".to_string(),
            ));
        }

        counter!(AUTH_LOGIN_ATTEMPT).increment(1);
        enforce_limit(&self.auth_limiter, &email, "login")?;

        let account = self
            .backend
            .sign_in(&email, &password)
            .await
            .map_err(|failure| backend_failure("login", failure))?;

        self.auth_limiter.reset(&email);
        counter!(AUTH_LOGIN_SUCCESS).increment(1);
        info!(uid = %account.uid, "signed in");
        Ok(account)
    }

    /// Create an account, set its display name and request verification
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let name_check = validate_name(name);
        ensure_valid(name_check.clone())?;
        let display_name = name_check.sanitized.unwrap_or_default();

        ensure_valid(validate_email(email))?;
        ensure_valid(validate_password(password))?;

        let email = normalize_email(email);
        let password = Zeroizing::new(password.trim().to_owned());

        enforce_limit(&self.auth_limiter, &email, "signup")?;

        let mut account = self
            .backend
            .sign_up(&email, &password)
            .await
            .map_err(|failure| backend_failure("signup", failure))?;

        if !display_name.is_empty() {
            self.backend
                .update_display_name(&account.uid, &display_name)
                .await
                .map_err(|failure| backend_failure("signup", failure))?;
            account.display_name = Some(display_name);
        }

        if !account.email_verified {
            self.backend
                .send_email_verification(&account.uid)
                .await
                .map_err(|failure| backend_failure("signup", failure))?;
        }

        self.auth_limiter.reset(&email);
        counter!(AUTH_SIGNUP_SUCCESS).increment(1);
        info!(uid = %account.uid, "account created");
        Ok(account)
    }

    /// Send a password reset email.
    ///
    /// The reset limiter is not cleared on success: the email itself is the
    /// action being throttled.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::InvalidInput(
                "Add your email address above so we can send the reset link.".to_string(),
            ));
        }

        enforce_limit(&self.reset_limiter, &email, "password_reset")?;

        self.backend
            .send_password_reset(&email)
            .await
            .map_err(|failure| backend_failure("password_reset", failure))?;

        counter!(AUTH_PASSWORD_RESET).increment(1);
        info!("password reset email sent");
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.backend
            .sign_out()
            .await
            .map_err(|failure| backend_failure("sign_out", failure))?;
        debug!("signed out");
        Ok(())
    }
}

fn ensure_valid(result: ValidationResult) -> Result<(), AppError> {
    if result.is_valid {
        return Ok(());
    }
    Err(AppError::InvalidInput(result.error.unwrap_or_default()))
}

fn enforce_limit(limiter: &RateLimiter, key: &str, action: &'static str) -> Result<(), AppError> {
    let decision = limiter.check_limit(key);
    if decision.allowed {
        debug!(action, remaining = decision.remaining_attempts, "attempt allowed");
        return Ok(());
    }

    let now = Utc::now();
    let minutes = decision.retry_after_minutes(now);
    counter!(AUTH_RATE_LIMITED, "action" => action).increment(1);
    warn!(action, minutes, "attempt rate limited");

    Err(AppError::RateLimited {
        reset_time: decision.reset_time.unwrap_or(now),
        minutes,
    })
}

fn backend_failure(action: &'static str, failure: AuthFailure) -> AppError {
    counter!(AUTH_BACKEND_FAILURE, "action" => action).increment(1);
    warn!(action, error = %failure, "credential service rejected request");
    AppError::Auth(failure)
}
