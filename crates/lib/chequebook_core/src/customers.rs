//! Cheque book eligibility check.

use thiserror::Error;

use crate::models::Account;
use crate::store::{ChequebookStore, StoreError};
use crate::validation::FieldErrors;

/// Message for accounts that exist but are not flagged for the service.
pub const NOT_ELIGIBLE: &str = "Customer is not eligible for cheque book";

/// Eligibility check errors.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Customer account not found")]
    NotFound,

    /// The account exists but its cheque book facility flag is `N`.
    #[error("Customer is not eligible for cheque book")]
    NotEligible,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Look up `cust_ac_no` and return it only if it may use the reorder service.
pub async fn check_eligibility(
    store: &dyn ChequebookStore,
    cust_ac_no: &str,
) -> Result<Account, CustomerError> {
    let cust_ac_no = cust_ac_no.trim();
    if cust_ac_no.is_empty() {
        return Err(CustomerError::Validation(FieldErrors::single(
            "accountNumber",
            "Account number is required",
        )));
    }

    let account = store
        .find_account(cust_ac_no)
        .await?
        .ok_or(CustomerError::NotFound)?;

    if !account.is_cheque_book_eligible() {
        return Err(CustomerError::NotEligible);
    }
    Ok(account)
}
