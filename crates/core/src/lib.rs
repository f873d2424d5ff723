// ============================
// crates/core/src/lib.rs
// ============================
//! Core of the moodlog journaling application: input validation, attempt
//! rate limiting, and the auth and journal layers built on them.

pub mod auth;
pub mod config;
pub mod entries;
pub mod error;
pub mod metrics;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthBackend, AuthFlow, RateLimiter};
use crate::config::Settings;
use crate::entries::{EntryStore, JournalService};

/// Everything one application session needs, built once and passed around.
///
/// Limiters live here rather than in globals so their lifetime is the
/// session's, and so tests get a fresh set per state.
pub struct AppState<B, S> {
    /// Configuration settings
    pub settings: Arc<Settings>,
    /// Login, sign-up and password reset
    pub auth: AuthFlow<B>,
    /// Journal entries
    pub journal: JournalService<S>,
}

impl<B: AuthBackend, S: EntryStore> AppState<B, S> {
    /// Create a new application state
    pub fn new(backend: B, store: S, settings: Settings) -> Self {
        let auth_limiter = Arc::new(RateLimiter::from_settings(&settings.auth_limit));
        let reset_limiter = Arc::new(RateLimiter::from_settings(
            &settings.password_reset_limit,
        ));
        let auth = AuthFlow::new(Arc::new(backend), auth_limiter, reset_limiter);

        Self {
            settings: Arc::new(settings),
            auth,
            journal: JournalService::new(store),
        }
    }

    /// Mood frequencies over the configured statistics window
    pub async fn recent_moods(
        &self,
        user_id: &str,
        today: chrono::NaiveDate,
    ) -> Result<std::collections::BTreeMap<String, usize>, error::AppError> {
        self.journal
            .mood_counts(user_id, today, self.settings.stats_window_days)
            .await
    }

    /// Drop expired limiter records. Returns how many were removed.
    pub fn sweep_limiters(&self) -> usize {
        self.auth.auth_limiter().sweep_expired() + self.auth.reset_limiter().sweep_expired()
    }
}
