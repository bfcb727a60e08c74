//! Authentication Handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::application::dto::response::UserResponse;
use crate::application::services::{AuthError, AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Build the auth service from application state.
fn auth_service(
    state: &AppState,
) -> AuthServiceImpl<PgUserRepository, PgSessionRepository> {
    AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgSessionRepository::new(state.db.clone())),
        state.snowflake.clone(),
        state.settings.session.clone(),
    )
}

/// Build the session cookie carrying the opaque token.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.settings.session.cookie_name.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.settings.session.cookie_secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn map_auth_error(error: AuthError) -> AppError {
    match error {
        AuthError::InvalidCredentials => {
            AppError::Unauthorized("Invalid email or password".into())
        }
        AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
        AuthError::AccountSuspended => AppError::Forbidden("Account suspended".into()),
        AuthError::SessionNotFound => AppError::Unauthorized("Invalid session".into()),
        AuthError::UserNotFound => AppError::NotFound("User not found".into()),
        AuthError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a new user (`POST /api/auth/register`)
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let (user, token) = auth_service(&state)
        .register(&body.email, &body.password, body.display_name, body.phone)
        .await
        .map_err(map_auth_error)?;

    let jar = jar.add(session_cookie(&state, token));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserResponse::from_user(user, true)),
    ))
}

/// Login with credentials (`POST /api/auth/login`)
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let (user, token) = auth_service(&state)
        .login(&body.email, &body.password, user_agent)
        .await
        .map_err(map_auth_error)?;

    let jar = jar.add(session_cookie(&state, token));

    Ok((jar, Json(UserResponse::from_user(user, true))))
}

/// Logout, revoking the session (`POST /api/auth/logout`)
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(cookie) = jar.get(&state.settings.session.cookie_name) {
        // Best effort; an already-revoked session still clears the cookie.
        let _ = auth_service(&state).logout(cookie.value()).await;
    }

    let mut removal = Cookie::new(state.settings.session.cookie_name.clone(), "");
    removal.set_path("/");
    let jar = jar.remove(removal);

    Ok((jar, StatusCode::NO_CONTENT))
}

/// Current user (`GET /api/auth/me`)
pub async fn me(Extension(auth): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse::from_user(auth.user, true))
}

/// Update profile (`PATCH /api/auth/me`)
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let user = auth_service(&state)
        .update_profile(auth.id(), body.display_name, body.phone)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(UserResponse::from_user(user, true)))
}
