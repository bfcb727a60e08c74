//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, create_security_headers_layer, rate_limit_api, rate_limit_auth,
    require_admin, track_metrics,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Per-request counters/histograms
        .layer(middleware::from_fn(track_metrics))
        // Security headers are outermost so every response carries them
        .layer(create_security_headers_layer())
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes under /api
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth has its own stricter rate limiting
        .nest("/auth", auth_routes(state.clone()))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        // General API rate limiting over everything
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}

/// Authentication routes (stricter rate limiting; /me requires a session)
fn auth_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth,
        ));

    let protected = Router::new()
        .route(
            "/me",
            get(handlers::auth::me).patch(handlers::auth::update_me),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Public browse/search routes (no session required)
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/zones", get(handlers::catalog::list_zones))
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/listings", get(handlers::listing::search))
        .route("/listings/{id}", get(handlers::listing::get))
        .route("/properties", get(handlers::property::search))
        .route("/properties/{id}", get(handlers::property::get))
        .route("/properties/{id}/leads", post(handlers::property::create_lead))
        .route("/restaurants", get(handlers::restaurant::list))
        .route("/restaurants/{id}", get(handlers::restaurant::get))
        .route("/tenants/{slug}", get(handlers::catalog::get_tenant))
        .route(
            "/subscriptions/plans",
            get(handlers::subscription::list_plans),
        )
}

/// Routes that require an authenticated session
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Publishing (plan-limit checked in the handlers)
        .route("/publish/listing", post(handlers::listing::publish))
        .route("/publish/property", post(handlers::property::publish))
        // Listing management
        .route(
            "/listings/{id}",
            patch(handlers::listing::update).delete(handlers::listing::delete),
        )
        .route("/listings/{id}/status", patch(handlers::listing::set_status))
        // Listing chat
        .route(
            "/listings/{id}/messages",
            get(handlers::chat::conversation).post(handlers::chat::send),
        )
        .route("/messages/unread", get(handlers::chat::unread))
        // Property management
        .route(
            "/properties/{id}",
            patch(handlers::property::update).delete(handlers::property::delete),
        )
        .route(
            "/properties/{id}/status",
            patch(handlers::property::set_status),
        )
        // Agency lead inbox
        .route("/leads", get(handlers::property::list_leads))
        .route("/leads/{id}", patch(handlers::property::update_lead))
        // Restaurants and menus
        .route("/restaurants", post(handlers::restaurant::create))
        .route("/restaurants/mine", get(handlers::restaurant::my_restaurants))
        .route("/restaurants/{id}", patch(handlers::restaurant::update))
        .route(
            "/restaurants/{id}/menu-items",
            post(handlers::restaurant::add_menu_item),
        )
        .route(
            "/menu-items/{id}",
            patch(handlers::restaurant::update_menu_item)
                .delete(handlers::restaurant::delete_menu_item),
        )
        // Subscriptions and payments
        .route("/subscriptions", post(handlers::subscription::subscribe))
        .route("/payments", get(handlers::subscription::my_payments))
        .route("/subscriptions/me", get(handlers::subscription::my_subscription))
        .route(
            "/subscriptions/limits/{type}",
            get(handlers::subscription::check_limit),
        )
        // Bulk import
        .route("/import/listings", post(handlers::import::import_listings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Admin routes (session + admin role)
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route(
            "/users/{id}/status",
            patch(handlers::admin::set_user_status),
        )
        .route("/users/{id}", delete(handlers::admin::delete_user))
        .route("/payments", get(handlers::admin::list_payments))
        .route(
            "/payments/{id}/confirm",
            post(handlers::admin::confirm_payment),
        )
        .route(
            "/payments/{id}/reject",
            post(handlers::admin::reject_payment),
        )
        .route(
            "/tenants",
            get(handlers::admin::list_tenants).post(handlers::admin::create_tenant),
        )
        .route("/tenants/{id}", patch(handlers::admin::update_tenant))
        // route_layer ordering: the last layer runs first, so the session
        // is resolved before the admin gate
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
