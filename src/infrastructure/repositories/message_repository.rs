//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Message, MessageRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    listing_id: i64,
    sender_id: i64,
    recipient_id: i64,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            listing_id: self.listing_id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            body: self.body,
            read: self.read,
            created_at: self.created_at,
        }
    }
}

const MESSAGE_COLUMNS: &str =
    "id, listing_id, sender_id, recipient_id, body, read, created_at";

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            INSERT INTO messages (id, listing_id, sender_id, recipient_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(message.id)
        .bind(message.listing_id)
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(&message.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    async fn list_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE listing_id = $1
              AND ((sender_id = $2 AND recipient_id = $3)
                   OR (sender_id = $3 AND recipient_id = $2))
            ORDER BY created_at
            LIMIT $4
            "#
        ))
        .bind(listing_id)
        .bind(user_a)
        .bind(user_b)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }

    async fn mark_read(&self, listing_id: i64, recipient_id: i64) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read = TRUE
            WHERE listing_id = $1 AND recipient_id = $2 AND read = FALSE
            "#,
        )
        .bind(listing_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
