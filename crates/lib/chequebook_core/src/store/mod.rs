//! Storage port.
//!
//! Every domain operation runs against a [`ChequebookStore`]. The API holds one
//! behind an `Arc` in its shared state; the server builds a [`PgStore`] from a
//! connection pool at startup. Tests use `MemoryStore` (feature `test-support`).

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, Flag, NewSubscription, Subscription, SubscriptionPatch, User, UserRecord};
use crate::pagination::PageRequest;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result of the create-or-replace subscription write.
#[derive(Debug, Clone)]
pub struct Upserted {
    pub subscription: Subscription,
    /// `true` when no row existed for the account before the write.
    pub created: bool,
}

/// One page of subscriptions plus the size of the whole (filtered) listing.
#[derive(Debug, Clone)]
pub struct SubscriptionSlice {
    pub rows: Vec<Subscription>,
    pub total_records: u64,
}

/// Persistence operations used by the service.
///
/// Each method is a single round trip (or a short sequence on one connection);
/// implementations hold no locks across calls.
#[async_trait]
pub trait ChequebookStore: Send + Sync {
    /// Case-insensitive username lookup.
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// All users, ordered by username.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_account(&self, cust_ac_no: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts the subscription, or overwrites the existing row for the same
    /// account number. Must be atomic.
    async fn upsert_subscription(&self, new: &NewSubscription) -> Result<Upserted, StoreError>;

    /// Applies `patch` and refreshes `updated_at`. `None` when no row exists.
    async fn update_subscription(
        &self,
        cust_ac_no: &str,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Clears every flag and refreshes `updated_at`. `None` when no row exists.
    async fn unsubscribe(&self, cust_ac_no: &str) -> Result<Option<Subscription>, StoreError>;

    /// Newest-first page of subscriptions, optionally filtered on `subscribed`.
    async fn page_subscriptions(
        &self,
        status: Option<Flag>,
        page: PageRequest,
    ) -> Result<SubscriptionSlice, StoreError>;
}
