//! Health Check API Tests
//!
//! These hit the real router over a test database; run them with
//! `cargo test -- --ignored` and `TEST_DATABASE_URL` set.

use axum::http::StatusCode;

use crate::common::{read_json, TestApp};

/// Basic health check endpoint returns 200 OK
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Health check returns JSON with a status field
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_health_check_returns_json() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    let json = read_json(response).await;

    assert_eq!(json["status"], "healthy");
}

/// Liveness probe always returns 200
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_liveness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Readiness probe reports the database check
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_readiness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert!(json["checks"]["database"]["status"].is_string());
}

/// Metrics endpoint serves Prometheus text format
#[tokio::test]
#[ignore = "requires a running Postgres (TEST_DATABASE_URL)"]
async fn test_metrics_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
}
