//! Shared fixtures: an in-memory store behind the real router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chequebook_api::config::{ApiConfig, AppMode};
use chequebook_api::{AppState, router};
use chequebook_core::auth::jwt::generate_access_token;
use chequebook_core::auth::password::hash_password;
use chequebook_core::models::{Account, Flag, User, UserRecord};
use chequebook_core::store::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

pub fn john_doe() -> User {
    User {
        username: "JOHN.DOE".into(),
        fullname: "John Doe".into(),
        group_code: "BRANCH_OFFICER".into(),
        user_status: "E".into(),
        branch_code: "001".into(),
    }
}

pub fn account(cust_ac_no: &str, facility: Flag) -> Account {
    Account {
        branch_code: "001".into(),
        cust_ac_no: cust_ac_no.into(),
        description: "Savings".into(),
        customer_no: "C0001".into(),
        currency: "USD".into(),
        account_class: "SAV".into(),
        cheque_book_facility: facility,
    }
}

/// JOHN.DOE (no password hash), JANE.ROE (password `s3cret`), one eligible
/// and one ineligible account.
pub fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_user(john_doe())
        .with_user_record(UserRecord {
            user: User {
                username: "JANE.ROE".into(),
                fullname: "Jane Roe".into(),
                group_code: "BRANCH_MANAGER".into(),
                user_status: "E".into(),
                branch_code: "002".into(),
            },
            password_hash: Some(hash_password("s3cret").unwrap()),
        })
        .with_account(account("0011234567", Flag::Yes))
        .with_account(account("0019999999", Flag::No))
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mode(AppMode::Development)
    }

    pub fn with_mode(app_mode: AppMode) -> Self {
        let store = Arc::new(seeded_store());
        let state = AppState {
            store: store.clone(),
            config: ApiConfig {
                bind_addr: "127.0.0.1:0".into(),
                jwt_secret: SECRET.into(),
                token_ttl_secs: 3600,
                app_mode,
            },
        };
        Self {
            store,
            router: router(state),
        }
    }

    pub fn token(&self) -> String {
        generate_access_token(&john_doe(), SECRET.as_bytes(), 3600).unwrap()
    }

    /// Sends a request and returns status plus parsed JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(req).await
    }

    pub async fn send_request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = serde_json::from_slice(&bytes).expect("parse JSON");
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let token = self.token();
        self.send(Method::GET, uri, Some(&token), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.token();
        self.send(Method::POST, uri, Some(&token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.token();
        self.send(Method::PUT, uri, Some(&token), body).await
    }
}
