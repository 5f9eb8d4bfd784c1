//! On-disk login session.
//!
//! The session is two separate entries in one directory: `token` holds the raw
//! bearer token and `user` the JSON user projection. Both are written on login
//! and both are removed on logout or expiry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chequebook_core::models::{LoginResponse, User};
use thiserror::Error;
use tracing::debug;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login response carried no token")]
    MissingToken,

    #[error("no data directory available for session storage")]
    NoDataDir,

    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored user is unreadable: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$DATA_DIR/chequebook/session`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("chequebook").join("session"))
    }

    pub fn open_default() -> Result<Self, SessionError> {
        Self::default_dir().map(Self::new).ok_or(SessionError::NoDataDir)
    }

    /// Persist a login result. Payloads without a token are rejected and leave
    /// any previous session untouched.
    pub fn save(&self, login: &LoginResponse) -> Result<(), SessionError> {
        if login.token.trim().is_empty() {
            return Err(SessionError::MissingToken);
        }
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(TOKEN_FILE), &login.token)?;
        std::fs::write(self.dir.join(USER_FILE), serde_json::to_vec(&login.user)?)?;
        debug!(username = %login.user.username, "session saved");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(read_optional(&self.dir.join(TOKEN_FILE))?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    pub fn user(&self) -> Result<Option<User>, SessionError> {
        match read_optional(&self.dir.join(USER_FILE))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Removes both entries. Missing entries are not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        for name in [TOKEN_FILE, USER_FILE] {
            match std::fs::remove_file(self.dir.join(name)) {
                Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }
        debug!("session cleared");
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, std::io::Error> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(token: &str) -> LoginResponse {
        LoginResponse {
            user: User {
                username: "JOHN.DOE".into(),
                fullname: "John Doe".into(),
                group_code: "BRANCH_OFFICER".into(),
                user_status: "E".into(),
                branch_code: "001".into(),
            },
            token: token.into(),
        }
    }

    #[test]
    fn default_location_is_under_the_data_dir() {
        match SessionStore::open_default() {
            Ok(store) => assert!(store.dir.ends_with("chequebook/session")),
            Err(e) => assert!(matches!(e, SessionError::NoDataDir)),
        }
    }

    #[test]
    fn save_then_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session"));
        assert_eq!(store.token().unwrap(), None);

        store.save(&login("abc.def.ghi")).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(store.user().unwrap().unwrap().username, "JOHN.DOE");
        assert!(tmp.path().join("session/token").exists());
        assert!(tmp.path().join("session/user").exists());
    }

    #[test]
    fn tokenless_login_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        store.save(&login("first")).unwrap();

        assert!(matches!(store.save(&login("  ")), Err(SessionError::MissingToken)));
        assert_eq!(store.token().unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn clear_removes_both_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        store.save(&login("t")).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.token().unwrap(), None);
        assert!(store.user().unwrap().is_none());
    }
}
