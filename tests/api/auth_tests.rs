//! Authentication API Tests
//!
//! Session-cookie round trips against the real router; run with
//! `cargo test -- --ignored` and `TEST_DATABASE_URL` set.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{read_json, session_cookie, unique_email, TestApp};

/// Registration with valid data returns 201 and sets the session cookie
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_register_with_valid_data() {
    let app = TestApp::new().await;
    let body = json!({
        "email": unique_email(),
        "password": "ValidPassword123!"
    });

    let response = app.post_json("/api/auth/register", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(session_cookie(&response).is_some());
}

/// Registration with an invalid email fails with 400
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "not-an-email",
        "password": "ValidPassword123!"
    });

    let response = app.post_json("/api/auth/register", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Registering the same email twice fails with 409
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_register_with_duplicate_email_fails() {
    let app = TestApp::new().await;
    let email = unique_email();
    let body = json!({ "email": email, "password": "ValidPassword123!" });

    app.post_json("/api/auth/register", &body.to_string()).await;
    let response = app.post_json("/api/auth/register", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The session cookie from login resolves `/api/auth/me`
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_login_and_me_round_trip() {
    let app = TestApp::new().await;
    let email = unique_email();
    let register = json!({ "email": email, "password": "ValidPassword123!" });
    app.post_json("/api/auth/register", &register.to_string()).await;

    let login = json!({ "email": email, "password": "ValidPassword123!" });
    let response = app.post_json("/api/auth/login", &login.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("login should set the session cookie");

    let me = app.get_with_session("/api/auth/me", &cookie).await;
    assert_eq!(me.status(), StatusCode::OK);
    let json = read_json(me).await;
    assert_eq!(json["email"], email);
}

/// Wrong password fails with 401
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_login_with_invalid_credentials_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "nonexistent@example.com",
        "password": "WrongPassword123!"
    });

    let response = app.post_json("/api/auth/login", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes the session; `me` stops working
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_logout_invalidates_session() {
    let app = TestApp::new().await;
    let email = unique_email();
    let register = json!({ "email": email, "password": "ValidPassword123!" });
    let response = app.post_json("/api/auth/register", &register.to_string()).await;
    let cookie = session_cookie(&response).unwrap();

    let logout = app
        .post_json_with_session("/api/auth/logout", "{}", &cookie)
        .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = app.get_with_session("/api/auth/me", &cookie).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

/// Protected endpoints require the cookie
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_protected_endpoint_requires_session() {
    let app = TestApp::new().await;

    let response = app.get("/api/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
