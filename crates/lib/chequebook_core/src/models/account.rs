//! Customer account projection.

use serde::{Deserialize, Serialize};

use super::Flag;

/// A customer account from `sttm_cust_account`. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "BRANCH_CODE")]
    pub branch_code: String,
    #[serde(rename = "CUST_AC_NO")]
    pub cust_ac_no: String,
    #[serde(rename = "AC_DESC")]
    pub description: String,
    #[serde(rename = "CUST_NO")]
    pub customer_no: String,
    #[serde(rename = "CCY")]
    pub currency: String,
    #[serde(rename = "ACCOUNT_CLASS")]
    pub account_class: String,
    /// Whether the account may use the cheque book reorder service.
    #[serde(rename = "CHEQUE_BOOK_FACILITY")]
    pub cheque_book_facility: Flag,
}

impl Account {
    pub fn is_cheque_book_eligible(&self) -> bool {
        self.cheque_book_facility.is_set()
    }
}
