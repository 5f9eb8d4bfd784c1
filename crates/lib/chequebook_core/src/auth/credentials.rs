//! Staff credential verification.

use tracing::warn;

use super::AuthError;
use super::password::verify_password;
use crate::models::User;
use crate::store::ChequebookStore;
use crate::validation::{FieldErrors, is_blank};

/// Check a username/password pair and return the matching user.
///
/// The username match is case-insensitive. A bcrypt hash on the user row is
/// checked against `password`; rows without a hash are accepted on username
/// alone and logged.
pub async fn verify_credentials(
    store: &dyn ChequebookStore,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, AuthError> {
    let mut errors = FieldErrors::new();
    if is_blank(username) {
        errors.add("username", "Username is required");
    }
    if is_blank(password) {
        errors.add("password", "Password is required");
    }
    errors.into_result().map_err(AuthError::Validation)?;
    let (username, password) = (username.unwrap_or_default(), password.unwrap_or_default());

    let record = store
        .find_user(username.trim())
        .await?
        .ok_or(AuthError::UserNotFound)?;

    match record.password_hash.as_deref() {
        Some(hash) => {
            if !verify_password(password, hash)? {
                return Err(AuthError::CredentialError);
            }
        }
        None => {
            warn!(username = %record.user.username, "user has no password hash; accepted on username alone");
        }
    }

    Ok(record.user)
}
