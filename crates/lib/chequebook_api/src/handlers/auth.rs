//! Authentication request handlers.

use axum::extract::State;

use crate::AppState;
use crate::envelope::ApiResponse;
use crate::error::{AppResult, OrFail};
use crate::extract::ApiJson;
use crate::services::auth::{self, LoginRequest};

/// `POST /api/v1/auth/login` — authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse> {
    let resp = auth::login(
        state.store.as_ref(),
        &body,
        state.config.jwt_secret.as_bytes(),
        state.config.token_ttl_secs,
    )
    .await
    .or_fail(&state.config, "Login failed")?;
    ApiResponse::ok("Login successful", &resp)
}
