//! Subscription lifecycle.
//!
//! Per account number a subscription is either absent/unsubscribed
//! (`subscribed = N`) or subscribed (`subscribed = Y` with a threshold). The
//! transitions are:
//!
//! - [`subscribe`]: create, or overwrite the existing row in place.
//! - [`update`]: apply a partial patch to an existing row.
//! - [`unsubscribe`]: clear every flag, keep the row.
//!
//! Rows are never deleted. Listings are newest first.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{Flag, NewSubscription, Subscription, SubscriptionPatch};
use crate::pagination::{PageMeta, PageRequest};
use crate::store::{ChequebookStore, StoreError, Upserted};
use crate::validation::{FieldErrors, is_blank};

/// Message for transitions on an account that has no subscription row.
pub const SUBSCRIPTION_NOT_FOUND: &str = "Customer subscription not found";

const THRESHOLD_NOT_POSITIVE: &str = "Reorder threshold number must be a positive integer";

/// Subscription errors.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Customer subscription not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Body of a subscribe call. Every field is required; flags must be explicit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub cust_ac_no: Option<String>,
    pub branch_code: Option<String>,
    pub reorder_threshold_number: Option<i64>,
    pub subscribed: Option<Flag>,
    pub notify_sms: Option<Flag>,
    pub notify_email: Option<Flag>,
    pub notify_rm: Option<Flag>,
}

impl SubscribeRequest {
    /// Checks presence of every field and the threshold range.
    ///
    /// `notify_rm` must be supplied but is always stored as `Y`.
    pub fn validate(self) -> Result<NewSubscription, FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(self.cust_ac_no.as_deref()) {
            errors.add("cust_ac_no", "Customer account number is required");
        }
        if is_blank(self.branch_code.as_deref()) {
            errors.add("branch_code", "Branch code is required");
        }
        let threshold = match self.reorder_threshold_number {
            None => {
                errors.add("reorder_threshold_number", "Reorder threshold number is required");
                None
            }
            Some(n) => check_threshold(n, &mut errors),
        };
        if self.subscribed.is_none() {
            errors.add("subscribed", "Subscribed status is required");
        }
        if self.notify_sms.is_none() {
            errors.add("notify_sms", "SMS notification preference is required");
        }
        if self.notify_email.is_none() {
            errors.add("notify_email", "Email notification preference is required");
        }
        if self.notify_rm.is_none() {
            errors.add("notify_rm", "RM notification preference is required");
        }

        match (
            self.cust_ac_no,
            self.branch_code,
            threshold,
            self.subscribed,
            self.notify_sms,
            self.notify_email,
        ) {
            (Some(cust_ac_no), Some(branch_code), Some(threshold), Some(subscribed), Some(sms), Some(email))
                if errors.is_empty() =>
            {
                Ok(NewSubscription {
                    cust_ac_no: cust_ac_no.trim().to_string(),
                    branch_code: branch_code.trim().to_string(),
                    reorder_threshold_number: threshold,
                    subscribed,
                    notify_sms: sms,
                    notify_email: email,
                    notify_rm: Flag::Yes,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Body of a partial update. Absent (or `null`) fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_threshold_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_sms: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_email: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_rm: Option<Flag>,
}

impl UpdateSubscriptionRequest {
    /// Converts to a typed patch; rejects an empty one.
    pub fn validate(self) -> Result<SubscriptionPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let threshold = self
            .reorder_threshold_number
            .and_then(|n| check_threshold(n, &mut errors));
        if self.branch_code.as_deref().is_some_and(|b| b.trim().is_empty()) {
            errors.add("branch_code", "Branch code must not be blank");
        }

        let patch = SubscriptionPatch {
            branch_code: self.branch_code.map(|b| b.trim().to_string()),
            reorder_threshold_number: threshold,
            subscribed: self.subscribed,
            notify_sms: self.notify_sms,
            notify_email: self.notify_email,
            notify_rm: self.notify_rm,
        };
        if patch.is_empty() && errors.is_empty() {
            errors.add("fields", "At least one field must be provided for update");
        }
        errors.into_result().map(|()| patch)
    }
}

fn check_threshold(value: i64, errors: &mut FieldErrors) -> Option<i32> {
    match i32::try_from(value) {
        Ok(n) if n > 0 => Some(n),
        _ => {
            errors.add("reorder_threshold_number", THRESHOLD_NOT_POSITIVE);
            None
        }
    }
}

/// Description shown next to a status filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFilter {
    pub status: Flag,
    pub status_description: String,
}

impl StatusFilter {
    pub fn new(status: Flag) -> Self {
        Self {
            status,
            status_description: status_description(status).to_string(),
        }
    }
}

/// `Subscribed` or `Unsubscribed`.
pub fn status_description(status: Flag) -> &'static str {
    match status {
        Flag::Yes => "Subscribed",
        Flag::No => "Unsubscribed",
    }
}

/// A page of subscriptions with its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPage {
    pub subscriptions: Vec<Subscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<StatusFilter>,
    pub pagination: PageMeta,
}

/// Parses a status path segment (`Y`/`N`, any case).
pub fn parse_status(status: &str) -> Result<Flag, SubscriptionError> {
    Flag::parse(status).ok_or_else(|| {
        SubscriptionError::Validation(FieldErrors::single(
            "status",
            "Status must be Y (subscribed) or N (unsubscribed)",
        ))
    })
}

/// Create the subscription for an account, or overwrite the existing one.
///
/// `Upserted::created` tells the caller which of the two happened.
pub async fn subscribe(
    store: &dyn ChequebookStore,
    request: SubscribeRequest,
) -> Result<Upserted, SubscriptionError> {
    let new = request.validate().map_err(SubscriptionError::Validation)?;
    let upserted = store.upsert_subscription(&new).await?;
    info!(
        cust_ac_no = %new.cust_ac_no,
        created = upserted.created,
        "customer subscription saved"
    );
    Ok(upserted)
}

/// Apply the supplied fields to an existing subscription.
///
/// An empty request is rejected before the row is looked up.
pub async fn update(
    store: &dyn ChequebookStore,
    cust_ac_no: &str,
    request: UpdateSubscriptionRequest,
) -> Result<Subscription, SubscriptionError> {
    let patch = request.validate().map_err(SubscriptionError::Validation)?;
    let cust_ac_no = require_account_no(cust_ac_no)?;
    let updated = store
        .update_subscription(cust_ac_no, &patch)
        .await?
        .ok_or(SubscriptionError::NotFound)?;
    info!(cust_ac_no, "customer subscription updated");
    Ok(updated)
}

/// Turn every notification off for an account. Idempotent.
pub async fn unsubscribe(
    store: &dyn ChequebookStore,
    cust_ac_no: &str,
) -> Result<Subscription, SubscriptionError> {
    let cust_ac_no = require_account_no(cust_ac_no)?;
    let updated = store
        .unsubscribe(cust_ac_no)
        .await?
        .ok_or(SubscriptionError::NotFound)?;
    info!(cust_ac_no, "customer unsubscribed");
    Ok(updated)
}

/// Newest-first page over every subscription.
pub async fn list_all(
    store: &dyn ChequebookStore,
    page: PageRequest,
) -> Result<SubscriptionPage, SubscriptionError> {
    let slice = store.page_subscriptions(None, page).await?;
    Ok(SubscriptionPage {
        subscriptions: slice.rows,
        filter: None,
        pagination: PageMeta::new(page, slice.total_records),
    })
}

/// Newest-first page over subscriptions whose `subscribed` flag is `status`.
pub async fn list_by_status(
    store: &dyn ChequebookStore,
    status: Flag,
    page: PageRequest,
) -> Result<SubscriptionPage, SubscriptionError> {
    let slice = store.page_subscriptions(Some(status), page).await?;
    Ok(SubscriptionPage {
        subscriptions: slice.rows,
        filter: Some(StatusFilter::new(status)),
        pagination: PageMeta::new(page, slice.total_records),
    })
}

fn require_account_no(cust_ac_no: &str) -> Result<&str, SubscriptionError> {
    let trimmed = cust_ac_no.trim();
    if trimmed.is_empty() {
        return Err(SubscriptionError::Validation(FieldErrors::single(
            "cust_ac_no",
            "Customer account number is required",
        )));
    }
    Ok(trimmed)
}
