//! Chat Service
//!
//! Buyer/seller messaging scoped to a listing. Plain request/response
//! CRUD over the messages table; delivery is whenever the other side
//! polls the conversation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{ListingRepository, Message, MessageRepository};
use crate::shared::snowflake::SnowflakeGenerator;

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send a message about a listing. Buyers write to the listing owner;
    /// the owner must name the buyer they are replying to.
    async fn send(
        &self,
        listing_id: i64,
        sender_id: i64,
        to_user: Option<i64>,
        body: String,
    ) -> Result<Message, ChatError>;

    /// Fetch the sender's conversation with the other participant,
    /// marking received messages read.
    async fn conversation(
        &self,
        listing_id: i64,
        user_id: i64,
        with_user: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Message>, ChatError>;

    /// Unread message count across all of the user's conversations.
    async fn unread_count(&self, user_id: i64) -> Result<i64, ChatError>;
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("The listing owner must name a recipient")]
    RecipientRequired,

    #[error("Cannot message yourself")]
    SelfMessage,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ChatService implementation
pub struct ChatServiceImpl<M, L>
where
    M: MessageRepository,
    L: ListingRepository,
{
    message_repo: Arc<M>,
    listing_repo: Arc<L>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<M, L> ChatServiceImpl<M, L>
where
    M: MessageRepository,
    L: ListingRepository,
{
    /// Create a new ChatServiceImpl
    pub fn new(
        message_repo: Arc<M>,
        listing_repo: Arc<L>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            message_repo,
            listing_repo,
            id_generator,
        }
    }

    /// Work out the counterpart: buyers always talk to the owner, the
    /// owner picks which buyer thread to answer.
    async fn resolve_counterpart(
        &self,
        listing_id: i64,
        user_id: i64,
        named: Option<i64>,
    ) -> Result<i64, ChatError> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))?
            .filter(|l| !l.is_deleted())
            .ok_or(ChatError::ListingNotFound)?;

        if listing.user_id == user_id {
            named.ok_or(ChatError::RecipientRequired)
        } else {
            Ok(listing.user_id)
        }
    }
}

#[async_trait]
impl<M, L> ChatService for ChatServiceImpl<M, L>
where
    M: MessageRepository + 'static,
    L: ListingRepository + 'static,
{
    async fn send(
        &self,
        listing_id: i64,
        sender_id: i64,
        to_user: Option<i64>,
        body: String,
    ) -> Result<Message, ChatError> {
        let recipient_id = self
            .resolve_counterpart(listing_id, sender_id, to_user)
            .await?;

        if recipient_id == sender_id {
            return Err(ChatError::SelfMessage);
        }

        let message = Message {
            id: self.id_generator.generate(),
            listing_id,
            sender_id,
            recipient_id,
            body,
            read: false,
            created_at: Utc::now(),
        };

        self.message_repo
            .create(&message)
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))
    }

    async fn conversation(
        &self,
        listing_id: i64,
        user_id: i64,
        with_user: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Message>, ChatError> {
        let counterpart = self
            .resolve_counterpart(listing_id, user_id, with_user)
            .await?;

        let messages = self
            .message_repo
            .list_conversation(listing_id, user_id, counterpart, limit)
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))?;

        // Reading the thread clears the unread flags addressed to us.
        self.message_repo
            .mark_read(listing_id, user_id)
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))?;

        Ok(messages)
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, ChatError> {
        self.message_repo
            .unread_count(user_id)
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))
    }
}
