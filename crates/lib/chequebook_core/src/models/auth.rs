//! Staff user and session token models.

use serde::{Deserialize, Serialize};

/// Branch staff user, as projected from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "FULLNAME")]
    pub fullname: String,
    /// Role code; role checks compare against this.
    #[serde(rename = "GROUP_CODE")]
    pub group_code: String,
    #[serde(rename = "USER_STATUS")]
    pub user_status: String,
    #[serde(rename = "BRANCH_CODE")]
    pub branch_code: String,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    /// bcrypt hash. Legacy rows have none.
    pub password_hash: Option<String>,
}

/// JWT claims embedded in session tokens.
///
/// Identity is taken from the token on every request and never re-read from
/// the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub username: String,
    pub group_code: String,
    pub user_status: String,
    pub branch_code: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Login result: the user projection plus a freshly issued session token.
///
/// Flattened on the wire, so the token sits next to `USERNAME` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}
