//! Login flow: credential check plus session token issue.

use chequebook_core::auth::jwt::generate_access_token;
use chequebook_core::auth::{AuthError, verify_credentials};
use chequebook_core::models::LoginResponse;
use chequebook_core::store::ChequebookStore;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Authenticate a branch user and issue a session token.
pub async fn login(
    store: &dyn ChequebookStore,
    request: &LoginRequest,
    secret: &[u8],
    ttl_secs: i64,
) -> Result<LoginResponse, AuthError> {
    let user = verify_credentials(
        store,
        request.username.as_deref(),
        request.password.as_deref(),
    )
    .await?;
    let token = generate_access_token(&user, secret, ttl_secs)?;
    info!(username = %user.username, branch = %user.branch_code, "user logged in");
    Ok(LoginResponse { user, token })
}

#[cfg(test)]
mod tests {
    use chequebook_core::auth::jwt::verify_access_token;
    use chequebook_core::models::User;
    use chequebook_core::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn issued_token_carries_the_user() {
        let store = MemoryStore::new().with_user(User {
            username: "JOHN.DOE".into(),
            fullname: "John Doe".into(),
            group_code: "BRANCH".into(),
            user_status: "E".into(),
            branch_code: "001".into(),
        });
        let request = LoginRequest {
            username: Some("john.doe".into()),
            password: Some("anything".into()),
        };

        let resp = login(&store, &request, b"secret", 60).await.unwrap();
        assert_eq!(resp.user.username, "JOHN.DOE");

        let claims = verify_access_token(&resp.token, b"secret").unwrap();
        assert_eq!(claims.username, "JOHN.DOE");
        assert_eq!(claims.branch_code, "001");
        assert_eq!(claims.exp - claims.iat, 60);
    }
}
