//! Rate Limiting Middleware
//!
//! In-process sliding-window rate limiting keyed by client IP. Auth
//! endpoints get a stricter budget than the general API.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::config::RateLimitSettings;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Endpoint classes with separate budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Login/register, kept tight against credential stuffing
    Auth,
    /// Everything else under /api
    Api,
}

impl EndpointClass {
    fn key_prefix(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Api => "api",
        }
    }
}

/// Sliding window length shared by both classes.
const WINDOW: Duration = Duration::from_secs(60);

/// In-memory sliding-window rate limiter.
///
/// Each (class, client) pair keeps a deque of request instants behind a
/// parking_lot mutex; the dashmap shard lock is only taken for writes
/// when the key is first seen.
pub struct RateLimiter {
    windows: DashMap<String, Mutex<VecDeque<Instant>>>,
    auth_per_minute: u32,
    api_per_minute: u32,
}

impl RateLimiter {
    /// Create a limiter from settings.
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            windows: DashMap::new(),
            auth_per_minute: settings.auth_per_minute,
            api_per_minute: settings.api_per_minute,
        }
    }

    /// Record a hit; returns false when the budget is exhausted.
    pub fn check(&self, class: EndpointClass, client: &str) -> bool {
        let limit = match class {
            EndpointClass::Auth => self.auth_per_minute,
            EndpointClass::Api => self.api_per_minute,
        };
        let key = format!("{}:{}", class.key_prefix(), client);

        if let Some(window) = self.windows.get(&key) {
            return Self::admit(&mut window.lock(), limit);
        }

        let window = self
            .windows
            .entry(key)
            .or_insert_with(|| Mutex::new(VecDeque::new()));
        let admitted = Self::admit(&mut window.lock(), limit);
        admitted
    }

    fn admit(window: &mut VecDeque<Instant>, limit: u32) -> bool {
        let now = Instant::now();

        while window
            .front()
            .map(|t| now.duration_since(*t) > WINDOW)
            .unwrap_or(false)
        {
            window.pop_front();
        }

        if window.len() >= limit as usize {
            return false;
        }

        window.push_back(now);
        true
    }
}

/// Best-effort client key: X-Forwarded-For, then the socket address.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        return forwarded.trim().to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Strict rate limiting for auth endpoints.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    rate_limit(EndpointClass::Auth, state, request, next).await
}

/// General API rate limiting.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    rate_limit(EndpointClass::Api, state, request, next).await
}

async fn rate_limit(
    class: EndpointClass,
    state: AppState,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request);

    if !state.rate_limiter.check(class, &client) {
        tracing::warn!(client = %client, class = ?class, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(auth: u32, api: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitSettings {
            auth_per_minute: auth,
            api_per_minute: api,
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = limiter(3, 10);
        for _ in 0..3 {
            assert!(limiter.check(EndpointClass::Auth, "1.2.3.4"));
        }
        assert!(!limiter.check(EndpointClass::Auth, "1.2.3.4"));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = limiter(1, 10);
        assert!(limiter.check(EndpointClass::Auth, "1.2.3.4"));
        assert!(limiter.check(EndpointClass::Auth, "5.6.7.8"));
        assert!(!limiter.check(EndpointClass::Auth, "1.2.3.4"));
    }

    #[test]
    fn test_classes_have_separate_budgets() {
        let limiter = limiter(1, 10);
        assert!(limiter.check(EndpointClass::Auth, "1.2.3.4"));
        // Same client still has API budget left.
        assert!(limiter.check(EndpointClass::Api, "1.2.3.4"));
    }
}
