//! Authentication Service
//!
//! Handles registration, login, and opaque session-token management.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use crate::config::SessionSettings;
use crate::domain::{Session, SessionRepository, User, UserRepository};
use crate::shared::snowflake::SnowflakeGenerator;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and open a session
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<(User, String), AuthError>;

    /// Authenticate with credentials and open a session
    async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> Result<(User, String), AuthError>;

    /// Revoke the session behind a token (logout)
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve the session token to its user
    async fn current_user(&self, token: &str) -> Result<User, AuthError>;

    /// Update profile fields of the authenticated user
    async fn update_profile(
        &self,
        user_id: i64,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, AuthError>;
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailExists,

    #[error("Account suspended")]
    AccountSuspended,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Hash a session token for storage and lookup.
///
/// Raw tokens live only in the cookie; the database sees the SHA-256 hex.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    id_generator: Arc<SnowflakeGenerator>,
    session_settings: SessionSettings,
}

impl<U, S> AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        id_generator: Arc<SnowflakeGenerator>,
        session_settings: SessionSettings,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            id_generator,
            session_settings,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Open a session for a user and return the raw cookie token.
    async fn open_session(
        &self,
        user_id: i64,
        user_agent: Option<String>,
    ) -> Result<String, AuthError> {
        // Opaque token, no user info encoded
        let token = format!("{}.{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        let mut session = Session::new(
            user_id,
            hash_session_token(&token),
            Utc::now() + Duration::days(self.session_settings.ttl_days),
        );
        session.user_agent = user_agent;

        self.session_repo
            .create(&session)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(token)
    }
}

#[async_trait]
impl<U, S> AuthService for AuthServiceImpl<U, S>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<(User, String), AuthError> {
        if self
            .user_repo
            .email_exists(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::EmailExists);
        }

        let password_hash = self.hash_password(password)?;

        let now = Utc::now();
        let user = User {
            id: self.id_generator.generate(),
            email: email.to_lowercase(),
            password_hash,
            display_name,
            phone,
            created_at: now,
            updated_at: now,
            ..User::default()
        };

        let created_user = self
            .user_repo
            .create(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let token = self.open_session(created_user.id, None).await?;

        Ok((created_user, token))
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> Result<(User, String), AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active() {
            return Err(AuthError::AccountSuspended);
        }

        let token = self.open_session(user.id, user_agent).await?;

        Ok((user, token))
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let token_hash = hash_session_token(token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        self.session_repo
            .revoke(session.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let token_hash = hash_session_token(token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_active() {
            return Err(AuthError::SessionNotFound);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            return Err(AuthError::AccountSuspended);
        }

        self.session_repo
            .touch(session.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, AuthError> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if display_name.is_some() {
            user.display_name = display_name;
        }
        if phone.is_some() {
            user.phone = phone;
        }

        self.user_repo
            .update(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_session_token_is_hex_sha256() {
        let hash = hash_session_token("some-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_session_token_is_deterministic() {
        assert_eq!(hash_session_token("abc"), hash_session_token("abc"));
        assert_ne!(hash_session_token("abc"), hash_session_token("abd"));
    }
}
