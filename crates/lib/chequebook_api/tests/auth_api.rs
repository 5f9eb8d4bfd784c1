//! Login and session guard behaviour through the router.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chequebook_api::config::AppMode;
use chequebook_core::auth::jwt::{encode_claims, verify_access_token};
use chequebook_core::models::TokenClaims;
use chrono::Utc;
use common::{SECRET, TestApp};
use serde_json::json;

#[tokio::test]
async fn login_returns_user_and_token() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "john.doe", "password": "x" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["USERNAME"], "JOHN.DOE");
    assert_eq!(body["data"]["BRANCH_CODE"], "001");
    let token = body["data"]["token"].as_str().unwrap();
    let claims = verify_access_token(token, SECRET.as_bytes()).unwrap();
    assert_eq!(claims.username, "JOHN.DOE");
}

#[tokio::test]
async fn login_validates_both_fields_together() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"]["username"], "Username is required");
    assert_eq!(body["errors"]["password"], "Password is required");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn hashed_password_is_checked() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "JANE.ROE", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "jane.roe", "password": "s3cret" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_store_failure_is_relabelled() {
    let app = TestApp::new();
    app.store.set_offline(true);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "JOHN.DOE", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Login failed");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn production_hides_error_detail() {
    let app = TestApp::with_mode(AppMode::Production);
    app.store.set_offline(true);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "JOHN.DOE", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Login failed");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let app = TestApp::new();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]["body"].is_string());
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/api/v1/subscriptions", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Access token is required");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = TestApp::new();
    let req = Request::builder()
        .uri("/api/v1/users")
        .header(header::AUTHORIZATION, format!("Basic {}", app.token()))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send_request(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token is required");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new();
    let now = Utc::now().timestamp();
    let expired = encode_claims(
        &TokenClaims {
            username: "JOHN.DOE".into(),
            group_code: "BRANCH_OFFICER".into(),
            user_status: "E".into(),
            branch_code: "001".into(),
            exp: now - 120,
            iat: now - 3720,
        },
        SECRET.as_bytes(),
    )
    .unwrap();

    let (status, body) = app
        .send(Method::GET, "/api/v1/users", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn garbage_or_foreign_tokens_are_invalid() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/api/v1/users", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let now = Utc::now().timestamp();
    let foreign = encode_claims(
        &TokenClaims {
            username: "JOHN.DOE".into(),
            group_code: "BRANCH_OFFICER".into(),
            user_status: "E".into(),
            branch_code: "001".into(),
            exp: now + 600,
            iat: now,
        },
        b"some-other-secret",
    )
    .unwrap();
    let (status, body) = app
        .send(Method::GET, "/api/v1/users", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn users_are_listed_with_count() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Users retrieved successfully");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["USERNAME"], "JANE.ROE");
    assert_eq!(body["data"][1]["USERNAME"], "JOHN.DOE");
}
