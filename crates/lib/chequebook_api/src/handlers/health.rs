//! Service status endpoint.

use axum::Extension;
use serde::Serialize;

use crate::envelope::ApiResponse;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus<'a> {
    version: &'a str,
    authenticated_as: Option<&'a str>,
}

/// `GET /` — liveness plus the caller's identity when a valid token was sent.
pub async fn health_handler(user: Option<Extension<AuthenticatedUser>>) -> AppResult<ApiResponse> {
    let status = ServiceStatus {
        version: chequebook_core::version(),
        authenticated_as: user.as_ref().map(|Extension(u)| u.0.username.as_str()),
    };
    ApiResponse::ok("Backend Service is running", &status)
}
