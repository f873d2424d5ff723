// ============================
// crates/core/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod backend;
pub mod flow;
pub mod memory;
pub mod password;
pub mod rate_limit;

pub use backend::{AuthBackend, AuthFailure};
pub use flow::AuthFlow;
pub use memory::{MemoryAuthBackend, OutboundEmail};
pub use password::{hash_password, verify_password};
pub use rate_limit::RateLimiter;
