// ==============
// crates/core/src/metrics.rs

//! Central place for metric keys
pub const AUTH_LOGIN_ATTEMPT: &str = "auth.login.attempt";
pub const AUTH_LOGIN_SUCCESS: &str = "auth.login.success";
pub const AUTH_SIGNUP_SUCCESS: &str = "auth.signup.success";
pub const AUTH_PASSWORD_RESET: &str = "auth.password_reset";
pub const AUTH_RATE_LIMITED: &str = "auth.rate_limited";
pub const AUTH_BACKEND_FAILURE: &str = "auth.backend_failure";
pub const ENTRY_SAVED: &str = "entry.saved";
pub const ENTRY_DELETED: &str = "entry.deleted";
pub const ENTRY_REJECTED: &str = "entry.rejected";
