//! Authentication Middleware
//!
//! Session-cookie validation for protected routes: the opaque cookie
//! token is hashed and resolved to its session and user on every request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::application::services::hash_session_token;
use crate::domain::{SessionRepository, User, UserRepository, UserRole};
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension inserted for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    /// The user's Snowflake ID.
    pub fn id(&self) -> i64 {
        self.user.id
    }

    /// Whether the user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }
}

/// Authentication middleware that validates the session cookie.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(&state.settings.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing session cookie".into()))?;

    let session_repo = PgSessionRepository::new(state.db.clone());
    let session = session_repo
        .find_by_token_hash(&hash_session_token(&token))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid session".into()))?;

    if !session.is_active() {
        return Err(AppError::Unauthorized("Session expired".into()));
    }

    let user = PgUserRepository::new(state.db.clone())
        .find_by_id(session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid session".into()))?;

    if !user.is_active() {
        return Err(AppError::Forbidden("Account suspended".into()));
    }

    session_repo.touch(session.id).await?;

    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

/// Gate for admin-only routes; must run after `auth_middleware`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<AuthUser>()
        .map(|auth| auth.is_admin())
        .unwrap_or(false);

    if !is_admin {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    Ok(next.run(request).await)
}
