//! Staff user listing.

use axum::extract::State;

use crate::AppState;
use crate::envelope::ApiResponse;
use crate::error::{AppResult, OrFail};

/// `GET /api/v1/users` — every user projection, ordered by username.
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<ApiResponse> {
    let users = state
        .store
        .list_users()
        .await
        .or_fail(&state.config, "Failed to fetch users")?;
    ApiResponse::ok("Users retrieved successfully", &users)
}
