//! Customer account lookup.

use axum::extract::{Path, State};
use chequebook_core::customers;

use crate::AppState;
use crate::envelope::ApiResponse;
use crate::error::{AppResult, OrFail};

/// `GET /api/v1/customers/{accountNumber}` — the account, if it may use the
/// reorder service.
pub async fn customer_handler(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> AppResult<ApiResponse> {
    let account = customers::check_eligibility(state.store.as_ref(), &account_number)
        .await
        .or_fail(&state.config, "Failed to retrieve customer details")?;
    ApiResponse::ok("Customer details retrieved successfully", &account)
}
