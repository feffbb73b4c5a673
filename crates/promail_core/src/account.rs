//! crates/promail_core/src/account.rs
//!
//! Owns the `User` record: creation at sign-in, the lazy daily points reset,
//! and balance mutations. Every mutation is persisted immediately.

use chrono::Local;
use std::sync::Arc;
use crate::domain::User;
use crate::ports::{PortError, PortResult, StorageService};

/// The free balance granted once per calendar day.
pub const DAILY_POINTS: u32 = 100;

/// The reserved identity whose account carries the admin flag.
pub const ADMIN_EMAIL: &str = "admin@promail.ai";

/// Errors produced by balance mutations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A debit was requested for more points than the account holds.
    /// The balance is left untouched; it is never clamped to zero.
    #[error("Insufficient balance: have {balance}, requested {requested}")]
    InsufficientBalance { balance: u32, requested: u32 },

    #[error(transparent)]
    Storage(#[from] PortError),
}

/// Manages the singleton `User` record in the profile store.
///
/// The daily reset is evaluated lazily on [`load`](AccountManager::load)
/// rather than by a background timer. A session kept open across midnight
/// without a reload keeps its stale balance until the next load; this is an
/// accepted limitation of the lazy design, not a bug.
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn StorageService>,
}

impl AccountManager {
    pub fn new(store: Arc<dyn StorageService>) -> Self {
        Self { store }
    }

    /// Reads the persisted user, applying the daily reset when the stored
    /// `last_reset_date` is not today's local calendar date.
    ///
    /// The reset sets `points` to exactly [`DAILY_POINTS`] regardless of the
    /// prior balance and persists once. A same-day reload writes nothing.
    pub async fn load(&self) -> PortResult<Option<User>> {
        let Some(mut user) = self.store.load_user().await? else {
            return Ok(None);
        };

        let today = Local::now().date_naive();
        if user.last_reset_date != today {
            user.points = DAILY_POINTS;
            user.last_reset_date = today;
            self.store.save_user(&user).await?;
        }

        Ok(Some(user))
    }

    /// Constructs and persists a fresh user for `email`.
    ///
    /// Callers must have validated the email (it contains an `@`) before
    /// calling; this constructor does not re-check it.
    pub async fn create(&self, email: &str) -> PortResult<User> {
        let user = User {
            email: email.to_string(),
            points: DAILY_POINTS,
            last_reset_date: Local::now().date_naive(),
            is_admin: email == ADMIN_EMAIL,
        };
        self.store.save_user(&user).await?;
        Ok(user)
    }

    /// Subtracts `amount` from the balance and persists the result.
    ///
    /// The balance is re-read from the store so that overlapping requests
    /// settle against the latest persisted value, never a cached snapshot.
    /// Signals [`AccountError::InsufficientBalance`] when the account holds
    /// fewer than `amount` points; callers are expected to have checked the
    /// balance beforehand.
    pub async fn debit(&self, amount: u32) -> Result<User, AccountError> {
        let mut user = self.current().await?;
        if user.points < amount {
            return Err(AccountError::InsufficientBalance {
                balance: user.points,
                requested: amount,
            });
        }
        user.points -= amount;
        self.store.save_user(&user).await?;
        Ok(user)
    }

    /// Adds `amount` to the balance and persists the result.
    pub async fn credit(&self, amount: u32) -> Result<User, AccountError> {
        let mut user = self.current().await?;
        user.points += amount;
        self.store.save_user(&user).await?;
        Ok(user)
    }

    /// Removes the persisted user (sign-out). The usage and visit logs are
    /// left untouched.
    pub async fn clear(&self) -> PortResult<()> {
        self.store.clear_user().await
    }

    async fn current(&self) -> PortResult<User> {
        self.store
            .load_user()
            .await?
            .ok_or_else(|| PortError::NotFound("No signed-in user".to_string()))
    }
}
