//! In-memory store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ChequebookStore, StoreError, SubscriptionSlice, Upserted};
use crate::models::{Account, Flag, NewSubscription, Subscription, SubscriptionPatch, User, UserRecord};
use crate::pagination::{PageRequest, page_of};
use crate::uuid::uuidv7;

#[derive(Default)]
struct MemoryState {
    users: Vec<UserRecord>,
    accounts: HashMap<String, Account>,
    subscriptions: HashMap<String, Subscription>,
}

/// Store that keeps everything in process memory.
///
/// Seed it with the `with_*` builders before sharing it. `set_offline(true)`
/// makes every call fail with [`StoreError::Unavailable`].
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user without a password hash.
    pub fn with_user(self, user: User) -> Self {
        self.with_user_record(UserRecord {
            user,
            password_hash: None,
        })
    }

    pub fn with_user_record(mut self, record: UserRecord) -> Self {
        self.state.get_mut().users.push(record);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.state
            .get_mut()
            .accounts
            .insert(account.cust_ac_no.clone(), account);
        self
    }

    /// Toggles simulated database failure.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of subscription rows held.
    pub async fn subscription_count(&self) -> usize {
        self.state.read().await.subscriptions.len()
    }

    /// The row for `cust_ac_no`, if any.
    pub async fn subscription(&self, cust_ac_no: &str) -> Option<Subscription> {
        self.state.read().await.subscriptions.get(cust_ac_no).cloned()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChequebookStore for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|r| r.user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.iter().map(|r| r.user.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_account(&self, cust_ac_no: &str) -> Result<Option<Account>, StoreError> {
        self.check_online()?;
        Ok(self.state.read().await.accounts.get(cust_ac_no).cloned())
    }

    async fn upsert_subscription(&self, new: &NewSubscription) -> Result<Upserted, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        let now = Utc::now();

        if let Some(existing) = state.subscriptions.get_mut(&new.cust_ac_no) {
            existing.branch_code.clone_from(&new.branch_code);
            existing.reorder_threshold_number = new.reorder_threshold_number;
            existing.subscribed = new.subscribed;
            existing.notify_sms = new.notify_sms;
            existing.notify_email = new.notify_email;
            existing.notify_rm = new.notify_rm;
            existing.updated_at = now;
            return Ok(Upserted {
                subscription: existing.clone(),
                created: false,
            });
        }

        let subscription = Subscription {
            id: uuidv7(),
            cust_ac_no: new.cust_ac_no.clone(),
            branch_code: new.branch_code.clone(),
            reorder_threshold_number: new.reorder_threshold_number,
            subscribed: new.subscribed,
            notify_sms: new.notify_sms,
            notify_email: new.notify_email,
            notify_rm: new.notify_rm,
            created_at: now,
            updated_at: now,
        };
        state
            .subscriptions
            .insert(new.cust_ac_no.clone(), subscription.clone());
        Ok(Upserted {
            subscription,
            created: true,
        })
    }

    async fn update_subscription(
        &self,
        cust_ac_no: &str,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        Ok(state.subscriptions.get_mut(cust_ac_no).map(|sub| {
            patch.apply_to(sub);
            sub.updated_at = Utc::now();
            sub.clone()
        }))
    }

    async fn unsubscribe(&self, cust_ac_no: &str) -> Result<Option<Subscription>, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        Ok(state.subscriptions.get_mut(cust_ac_no).map(|sub| {
            sub.subscribed = Flag::No;
            sub.notify_sms = Flag::No;
            sub.notify_email = Flag::No;
            sub.notify_rm = Flag::No;
            sub.updated_at = Utc::now();
            sub.clone()
        }))
    }

    async fn page_subscriptions(
        &self,
        status: Option<Flag>,
        page: PageRequest,
    ) -> Result<SubscriptionSlice, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        let mut rows: Vec<Subscription> = state
            .subscriptions
            .values()
            .filter(|s| status.is_none_or(|flag| s.subscribed == flag))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(SubscriptionSlice {
            total_records: rows.len() as u64,
            rows: page_of(&rows, page),
        })
    }
}
