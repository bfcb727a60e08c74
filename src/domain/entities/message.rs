//! Chat message entity and repository trait.
//!
//! Maps to the `messages` table: buyer/seller conversations scoped to a
//! listing. Plain CRUD rows, no realtime delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A chat message between two users about a listing.
///
/// Maps to the `messages` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - listing_id: BIGINT NOT NULL REFERENCES listings(id) ON DELETE CASCADE
/// - sender_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - recipient_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - body: TEXT NOT NULL
/// - read: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub listing_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,

    pub body: String,

    /// Whether the recipient has seen it
    pub read: bool,

    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Check whether a user is one of the two participants.
    pub fn involves(&self, user_id: i64) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a new message.
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    /// List the conversation between two users about a listing,
    /// oldest first.
    async fn list_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
        limit: i64,
    ) -> Result<Vec<Message>, AppError>;

    /// Mark every message addressed to `recipient_id` in a conversation
    /// as read. Returns rows affected.
    async fn mark_read(&self, listing_id: i64, recipient_id: i64) -> Result<i64, AppError>;

    /// Count unread messages across all conversations of a user.
    async fn unread_count(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves_both_participants_only() {
        let message = Message {
            id: 1,
            listing_id: 10,
            sender_id: 100,
            recipient_id: 200,
            body: "¿Sigue disponible?".into(),
            read: false,
            created_at: Utc::now(),
        };
        assert!(message.involves(100));
        assert!(message.involves(200));
        assert!(!message.involves(300));
    }
}
