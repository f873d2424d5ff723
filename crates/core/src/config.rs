// ============================
// crates/core/src/config.rs
// ============================
//! Configuration management.
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::rate_limit::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW, PASSWORD_RESET_MAX_ATTEMPTS, PASSWORD_RESET_WINDOW,
};
use crate::error::AppError;

/// Default config file, looked up relative to the working directory
pub const CONFIG_FILE: &str = "moodlog.toml";

/// Environment variables with this prefix override file values.
/// Nested keys are separated by `__`, e.g. `MOODLOG_AUTH_LIMIT__MAX_ATTEMPTS`.
pub const ENV_PREFIX: &str = "MOODLOG_";

/// Mood statistics look back this many days by default
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 30;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level
    pub log_level: String,
    /// Policy for login and sign-up attempts
    pub auth_limit: RateLimitSettings,
    /// Policy for password reset emails
    pub password_reset_limit: RateLimitSettings,
    /// Days of history summarized by mood statistics
    pub stats_window_days: u32,
}

/// One rate limiter policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Attempts allowed per window
    pub max_attempts: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitSettings {
    pub fn auth() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_secs: DEFAULT_WINDOW.as_secs(),
        }
    }

    pub fn password_reset() -> Self {
        Self {
            max_attempts: PASSWORD_RESET_MAX_ATTEMPTS,
            window_secs: PASSWORD_RESET_WINDOW.as_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            auth_limit: RateLimitSettings::auth(),
            password_reset_limit: RateLimitSettings::password_reset(),
            stats_window_days: DEFAULT_STATS_WINDOW_DAYS,
        }
    }
}

impl Settings {
    /// Layered sources: defaults, then `path`, then the environment
    pub fn figment_from<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load settings from `moodlog.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load settings from an explicit file. A missing file is not an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Self::figment_from(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make the application misbehave
    pub fn validate(&self) -> Result<(), AppError> {
        let level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(invalid(format!("unknown log level '{}'", self.log_level)));
        }

        for (name, limit) in [
            ("auth_limit", &self.auth_limit),
            ("password_reset_limit", &self.password_reset_limit),
        ] {
            if limit.window_secs == 0 {
                return Err(invalid(format!("{name}.window_secs must be positive")));
            }
        }

        if self.stats_window_days == 0 {
            return Err(invalid("stats_window_days must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> AppError {
    AppError::Config(figment::Error::from(msg))
}
