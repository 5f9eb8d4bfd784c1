//! Cheque book reorder subscription models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Flag;

/// A row of `chq_bk_reorder_sub`. One per account number; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub cust_ac_no: String,
    pub branch_code: String,
    pub reorder_threshold_number: i32,
    pub subscribed: Flag,
    pub notify_sms: Flag,
    pub notify_email: Flag,
    pub notify_rm: Flag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for the create-or-replace transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub cust_ac_no: String,
    pub branch_code: String,
    pub reorder_threshold_number: i32,
    pub subscribed: Flag,
    pub notify_sms: Flag,
    pub notify_email: Flag,
    pub notify_rm: Flag,
}

/// A partial update. `None` leaves the column as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub branch_code: Option<String>,
    pub reorder_threshold_number: Option<i32>,
    pub subscribed: Option<Flag>,
    pub notify_sms: Option<Flag>,
    pub notify_email: Option<Flag>,
    pub notify_rm: Option<Flag>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.branch_code.is_none()
            && self.reorder_threshold_number.is_none()
            && self.subscribed.is_none()
            && self.notify_sms.is_none()
            && self.notify_email.is_none()
            && self.notify_rm.is_none()
    }

    /// Applies the supplied fields to `subscription` in place.
    ///
    /// Does not touch `updated_at`; the store stamps that.
    pub fn apply_to(&self, subscription: &mut Subscription) {
        if let Some(branch_code) = &self.branch_code {
            subscription.branch_code.clone_from(branch_code);
        }
        if let Some(threshold) = self.reorder_threshold_number {
            subscription.reorder_threshold_number = threshold;
        }
        if let Some(flag) = self.subscribed {
            subscription.subscribed = flag;
        }
        if let Some(flag) = self.notify_sms {
            subscription.notify_sms = flag;
        }
        if let Some(flag) = self.notify_email {
            subscription.notify_email = flag;
        }
        if let Some(flag) = self.notify_rm {
            subscription.notify_rm = flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::now_v7(),
            cust_ac_no: "0011223344".into(),
            branch_code: "001".into(),
            reorder_threshold_number: 5,
            subscribed: Flag::Yes,
            notify_sms: Flag::Yes,
            notify_email: Flag::No,
            notify_rm: Flag::Yes,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(SubscriptionPatch::default().is_empty());
        let patch = SubscriptionPatch {
            notify_email: Some(Flag::Yes),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut sub = sample();
        let before = sub.clone();
        SubscriptionPatch {
            reorder_threshold_number: Some(12),
            notify_email: Some(Flag::Yes),
            ..Default::default()
        }
        .apply_to(&mut sub);

        assert_eq!(sub.reorder_threshold_number, 12);
        assert_eq!(sub.notify_email, Flag::Yes);
        assert_eq!(sub.branch_code, before.branch_code);
        assert_eq!(sub.notify_sms, before.notify_sms);
        assert_eq!(sub.subscribed, before.subscribed);
        assert_eq!(sub.updated_at, before.updated_at);
    }

    #[test]
    fn serializes_with_column_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["cust_ac_no"], "0011223344");
        assert_eq!(json["subscribed"], "Y");
        assert_eq!(json["notify_email"], "N");
        assert!(json["created_at"].is_string());
    }
}
