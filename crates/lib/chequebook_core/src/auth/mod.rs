//! Authentication logic.
//!
//! Credential verification, password hashing and session token management,
//! shared by the API crate.

pub mod credentials;
pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldErrors;

pub use credentials::verify_credentials;
pub use jwt::TokenError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
