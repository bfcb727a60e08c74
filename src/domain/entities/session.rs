//! User session entity and repository trait.
//!
//! Maps to the `sessions` table. Sessions back the opaque cookie tokens:
//! the raw token never touches the database, only its SHA-256 hash.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Represents an authenticated browser session.
///
/// Maps to the `sessions` table:
/// - id: UUID PRIMARY KEY DEFAULT gen_random_uuid()
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - token_hash: VARCHAR(64) NOT NULL UNIQUE (SHA-256 hex)
/// - user_agent: TEXT NULL
/// - expires_at: TIMESTAMPTZ NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - last_used_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - revoked_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// UUID primary key
    pub id: Uuid,

    /// User ID this session belongs to
    pub user_id: i64,

    /// SHA-256 hash of the session token (never store raw tokens)
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// Raw user agent string at login
    pub user_agent: Option<String>,

    /// When this session expires
    pub expires_at: DateTime<Utc>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session cookie was last seen
    pub last_used_at: DateTime<Utc>,

    /// When the session was revoked (None if active)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a new session.
    pub fn new(user_id: i64, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            user_agent: None,
            expires_at,
            created_at: now,
            last_used_at: now,
            revoked_at: None,
        }
    }

    /// Check if the session is currently active (not expired, not revoked).
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check if the session has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Repository trait for Session data access operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Create a new session.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Update last_used_at timestamp.
    async fn touch(&self, id: Uuid) -> Result<(), AppError>;

    /// Revoke a session (set revoked_at).
    async fn revoke(&self, id: Uuid) -> Result<(), AppError>;

    /// Revoke all sessions for a user (suspension, password change).
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Delete expired and revoked sessions (cleanup job).
    async fn delete_expired(&self) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_session_is_active() {
        let session = Session::new(1, "hash".into(), Utc::now() + Duration::days(30));
        assert!(session.is_active());
        assert!(!session.is_revoked());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session_is_not_active() {
        let session = Session::new(1, "hash".into(), Utc::now() - Duration::minutes(1));
        assert!(session.is_expired());
        assert!(!session.is_active());
    }

    #[test]
    fn test_revoked_session_is_not_active() {
        let mut session = Session::new(1, "hash".into(), Utc::now() + Duration::days(30));
        session.revoked_at = Some(Utc::now());
        assert!(session.is_revoked());
        assert!(!session.is_active());
    }

    #[test]
    fn test_token_hash_not_serialized() {
        let session = Session::new(1, "secret_hash".into(), Utc::now() + Duration::days(1));
        let serialized = serde_json::to_string(&session).unwrap();
        assert!(!serialized.contains("secret_hash"));
    }
}
