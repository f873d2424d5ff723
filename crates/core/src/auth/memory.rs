// ============================
// crates/core/src/auth/memory.rs
// ============================
//! In-process credential service.
//!
//! Mirrors the behaviour of a hosted account service closely enough to drive
//! the auth flow in tests and from the CLI. Outgoing emails are recorded in an
//! outbox instead of being sent.
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moodlog_common::Account;
use parking_lot::Mutex;

use super::backend::{AuthBackend, AuthFailure};
use super::password::{hash_password, verify_password};

/// The credential service refuses passwords shorter than this
const SERVICE_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password_hash: String,
    disabled: bool,
}

/// Email the service would have sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEmail {
    Verification { email: String },
    PasswordReset { email: String },
}

#[derive(Debug, Default)]
pub struct MemoryAuthBackend {
    /// Accounts keyed by email
    accounts: DashMap<String, StoredAccount>,
    current_uid: Mutex<Option<String>>,
    outbox: Mutex<Vec<OutboundEmail>>,
}

impl MemoryAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block an account; later sign-ins fail with [`AuthFailure::UserDisabled`]
    pub fn disable(&self, email: &str) -> bool {
        match self.accounts.get_mut(email) {
            Some(mut stored) => {
                stored.disabled = true;
                true
            },
            None => false,
        }
    }

    pub fn account(&self, email: &str) -> Option<Account> {
        self.accounts.get(email).map(|stored| stored.account.clone())
    }

    /// Uid of the signed-in account, if any
    pub fn current_uid(&self) -> Option<String> {
        self.current_uid.lock().clone()
    }

    pub fn outbox(&self) -> Vec<OutboundEmail> {
        self.outbox.lock().clone()
    }

    fn email_for_uid(&self, uid: &str) -> Option<String> {
        self.accounts
            .iter()
            .find(|entry| entry.account.uid == uid)
            .map(|entry| entry.key().clone())
    }
}

#[async_trait]
impl AuthBackend for MemoryAuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure> {
        let stored = self
            .accounts
            .get(email)
            .map(|stored| stored.value().clone())
            .ok_or(AuthFailure::UserNotFound)?;

        if stored.disabled {
            return Err(AuthFailure::UserDisabled);
        }
        if !verify_password(&stored.password_hash, password) {
            return Err(AuthFailure::WrongPassword);
        }

        *self.current_uid.lock() = Some(stored.account.uid.clone());
        Ok(stored.account)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthFailure> {
        if !email.contains('@') {
            return Err(AuthFailure::InvalidEmail);
        }
        if password.chars().count() < SERVICE_MIN_PASSWORD_LENGTH {
            return Err(AuthFailure::WeakPassword);
        }
        if self.accounts.contains_key(email) {
            return Err(AuthFailure::EmailAlreadyInUse);
        }

        let password_hash =
            hash_password(password).map_err(|e| AuthFailure::Other(e.to_string()))?;
        let account = Account {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.to_owned(),
            display_name: None,
            email_verified: false,
        };

        // Re-check under the entry lock in case of a concurrent sign-up
        match self.accounts.entry(email.to_owned()) {
            Entry::Occupied(_) => Err(AuthFailure::EmailAlreadyInUse),
            Entry::Vacant(vacant) => {
                vacant.insert(StoredAccount {
                    account: account.clone(),
                    password_hash,
                    disabled: false,
                });
                *self.current_uid.lock() = Some(account.uid.clone());
                Ok(account)
            },
        }
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> Result<(), AuthFailure> {
        let email = self.email_for_uid(uid).ok_or(AuthFailure::UserNotFound)?;
        let mut stored = self
            .accounts
            .get_mut(&email)
            .ok_or(AuthFailure::UserNotFound)?;
        stored.account.display_name = Some(name.to_owned());
        Ok(())
    }

    async fn send_email_verification(&self, uid: &str) -> Result<(), AuthFailure> {
        let email = self.email_for_uid(uid).ok_or(AuthFailure::UserNotFound)?;
        self.outbox.lock().push(OutboundEmail::Verification { email });
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthFailure> {
        if !self.accounts.contains_key(email) {
            return Err(AuthFailure::UserNotFound);
        }
        self.outbox.lock().push(OutboundEmail::PasswordReset {
            email: email.to_owned(),
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.current_uid.lock().take().map(|_| ()).ok_or(AuthFailure::NotSignedIn)
    }
}
