//! Bulk Import API Tests
//!
//! Run with `cargo test -- --ignored` and `TEST_DATABASE_URL` set.
//! Assumes the catalog has been seeded (`mercadoctl seed`).

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{read_json, session_cookie, unique_email, TestApp};

async fn subscribed_user(app: &TestApp) -> String {
    let register = json!({
        "email": unique_email(),
        "password": "ValidPassword123!"
    });
    let response = app.post_json("/api/auth/register", &register.to_string()).await;
    let cookie = session_cookie(&response).unwrap();

    let subscribe = json!({ "plan_code": "free" });
    app.post_json_with_session("/api/subscriptions", &subscribe.to_string(), &cookie)
        .await;

    cookie
}

/// A mixed batch reports imported rows and per-row errors
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_import_reports_row_errors() {
    let app = TestApp::new().await;
    let cookie = subscribed_user(&app).await;

    let body = json!({
        "rows": [
            {
                "titulo": "Mesa de roble",
                "categoria": "Muebles",
                "zona": "Pocitos",
                "precio": "4.500",
                "moneda": "UYU"
            },
            {
                // no zone: rejected, keyed by row number 2
                "titulo": "Silla",
                "categoria": "Muebles",
                "precio": "800"
            },
            {
                "titulo": "Heladera",
                "categoria": "Electrodomésticos",
                "zona": "Buceo",
                "precio": "no tiene"
            }
        ]
    });

    let response = app
        .post_json_with_session("/api/import/listings", &body.to_string(), &cookie)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let report = read_json(response).await;

    assert_eq!(report["imported"], 1);
    assert_eq!(report["skipped"], 2);
    assert_eq!(report["errors"][0]["row"], 2);
    assert_eq!(report["errors"][0]["field"], "zona");
    assert_eq!(report["errors"][1]["row"], 3);
    assert_eq!(report["errors"][1]["field"], "precio");
}

/// Import without a session is rejected
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_import_requires_session() {
    let app = TestApp::new().await;

    let body = json!({ "rows": [] });
    let response = app.post_json("/api/import/listings", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// An empty batch is a 400
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_import_rejects_empty_batch() {
    let app = TestApp::new().await;
    let cookie = subscribed_user(&app).await;

    let body = json!({ "rows": [] });
    let response = app
        .post_json_with_session("/api/import/listings", &body.to_string(), &cookie)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
