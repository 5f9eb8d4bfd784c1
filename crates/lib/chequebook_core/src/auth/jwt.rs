//! JWT session token generation and verification.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::info;

use crate::models::{TokenClaims, User};

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session token lifetime: 365 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Why a presented token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token verification failed: {0}")]
    Verification(String),

    #[error("jwt encode: {0}")]
    Encode(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Invalid,
            _ => TokenError::Verification(e.to_string()),
        }
    }
}

/// Generate a signed session token (HS256) carrying the user's identity claims.
///
/// `ttl_secs` must lie in `1..=MAX_TOKEN_TTL_SECS`.
pub fn generate_access_token(user: &User, secret: &[u8], ttl_secs: i64) -> Result<String, TokenError> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
        return Err(TokenError::Encode(format!("token lifetime out of range: {ttl_secs}s")));
    }
    let now = Utc::now();
    let exp = Duration::try_seconds(ttl_secs)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| TokenError::Encode(format!("token lifetime overflows: {ttl_secs}s")))?;
    let claims = TokenClaims {
        username: user.username.clone(),
        group_code: user.group_code.clone(),
        user_status: user.user_status.clone(),
        branch_code: user.branch_code.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };
    encode_claims(&claims, secret)
}

/// Sign arbitrary claims. Exposed for tests that need crafted tokens.
pub fn encode_claims(claims: &TokenClaims, secret: &[u8]) -> Result<String, TokenError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .map_err(|e| TokenError::Encode(e.to_string()))
}

/// Verify signature and expiry, returning the claims on success.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    let data = decode::<TokenClaims>(token, &key, &validation)?;
    Ok(data.claims)
}

/// Resolve the signing secret: env var `JWT_SECRET` → `SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET", "SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    persisted_jwt_secret()
}

/// The secret stored under the data dir, generated and written on first use.
pub fn persisted_jwt_secret() -> String {
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chequebook")
        .join("jwt-secret")
}
