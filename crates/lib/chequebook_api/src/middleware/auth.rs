//! Session guard: Bearer token extraction and JWT verification.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chequebook_core::auth::jwt::verify_access_token;
use chequebook_core::models::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Verified token claims, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::unauthorized("Access token is required"))?;

    let claims = verify_access_token(token, state.config.jwt_secret.as_bytes()).map_err(|e| {
        debug!(error = %e, "rejected session token");
        AppError::from(e).for_mode(state.config.app_mode)
    })?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

/// Like [`require_auth`] but never rejects; claims are attached only when a
/// valid token is present.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = bearer_token(request.headers())
        .and_then(|token| verify_access_token(token, state.config.jwt_secret.as_bytes()).ok());
    if let Some(claims) = claims {
        request.extensions_mut().insert(AuthenticatedUser(claims));
    }
    next.run(request).await
}

/// The non-empty token of a `Bearer` authorization header. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
