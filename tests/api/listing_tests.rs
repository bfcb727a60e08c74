//! Listing API Tests
//!
//! Publish/limit behavior against the real router; run with
//! `cargo test -- --ignored` and `TEST_DATABASE_URL` set. Assumes the
//! catalog has been seeded (`mercadoctl seed`).

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{read_json, session_cookie, unique_email, TestApp};

/// Register a fresh user on the free plan and return their cookie.
async fn free_user(app: &TestApp) -> String {
    let register = json!({
        "email": unique_email(),
        "password": "ValidPassword123!"
    });
    let response = app.post_json("/api/auth/register", &register.to_string()).await;
    let cookie = session_cookie(&response).expect("register should set the session cookie");

    let subscribe = json!({ "plan_code": "free" });
    let response = app
        .post_json_with_session("/api/subscriptions", &subscribe.to_string(), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    cookie
}

/// Fetch a seeded category and zone id pair.
async fn catalog_ids(app: &TestApp) -> (String, String) {
    let categories = read_json(app.get("/api/categories").await).await;
    let zones = read_json(app.get("/api/zones").await).await;

    (
        categories[0]["id"].as_str().unwrap().to_string(),
        zones[0]["id"].as_str().unwrap().to_string(),
    )
}

fn listing_body(title: &str, category_id: &str, zone_id: &str) -> String {
    json!({
        "title": title,
        "category_id": category_id,
        "zone_id": zone_id,
        "price": "1500",
        "currency": "UYU",
        "condition": "used"
    })
    .to_string()
}

/// Creating a listing with a blank title is rejected with 400
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_publish_with_missing_title_is_rejected() {
    let app = TestApp::new().await;
    let cookie = free_user(&app).await;
    let (category_id, zone_id) = catalog_ids(&app).await;

    let response = app
        .post_json_with_session(
            "/api/publish/listing",
            &listing_body("", &category_id, &zone_id),
            &cookie,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A free user with 5 active listings cannot publish a 6th
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_free_plan_limit_blocks_sixth_listing() {
    let app = TestApp::new().await;
    let cookie = free_user(&app).await;
    let (category_id, zone_id) = catalog_ids(&app).await;

    for i in 1..=5 {
        let response = app
            .post_json_with_session(
                "/api/publish/listing",
                &listing_body(&format!("Listing {i}"), &category_id, &zone_id),
                &cookie,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "listing {i}");
    }

    let response = app
        .post_json_with_session(
            "/api/publish/listing",
            &listing_body("One too many", &category_id, &zone_id),
            &cookie,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Publishing without any subscription is denied
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_publish_without_subscription_is_denied() {
    let app = TestApp::new().await;
    let register = json!({
        "email": unique_email(),
        "password": "ValidPassword123!"
    });
    let response = app.post_json("/api/auth/register", &register.to_string()).await;
    let cookie = session_cookie(&response).unwrap();
    let (category_id, zone_id) = catalog_ids(&app).await;

    let response = app
        .post_json_with_session(
            "/api/publish/listing",
            &listing_body("Mesa", &category_id, &zone_id),
            &cookie,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Public search does not require a session
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_search_is_public() {
    let app = TestApp::new().await;

    let response = app.get("/api/listings?limit=5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert!(json["items"].is_array());
}
