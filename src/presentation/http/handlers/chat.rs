//! Chat Handlers
//!
//! Listing-scoped buyer/seller messaging over plain REST.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use validator::Validate;

use crate::application::dto::request::{ConversationQueryParams, SendMessageRequest};
use crate::application::dto::response::MessageResponse;
use crate::application::services::{ChatError, ChatService, ChatServiceImpl};
use crate::infrastructure::repositories::{PgListingRepository, PgMessageRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::parse_id;

/// Build the chat service from application state.
fn chat_service(state: &AppState) -> ChatServiceImpl<PgMessageRepository, PgListingRepository> {
    ChatServiceImpl::new(
        Arc::new(PgMessageRepository::new(state.db.clone())),
        Arc::new(PgListingRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_chat_error(error: ChatError) -> AppError {
    match error {
        ChatError::ListingNotFound => AppError::NotFound("Listing not found".into()),
        ChatError::RecipientRequired => {
            AppError::BadRequest("to_user is required when replying as the owner".into())
        }
        ChatError::SelfMessage => AppError::BadRequest("Cannot message yourself".into()),
        ChatError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Send a message about a listing (`POST /api/listings/{id}/messages`)
pub async fn send(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let to_user = body.to_user.as_deref().map(parse_id).transpose()?;

    let message = chat_service(&state)
        .send(parse_id(&id)?, auth.id(), to_user, body.body)
        .await
        .map_err(map_chat_error)?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Read a conversation (`GET /api/listings/{id}/messages`)
pub async fn conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(params): Query<ConversationQueryParams>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let with_user = params.with_user.as_deref().map(parse_id).transpose()?;

    let messages = chat_service(&state)
        .conversation(
            parse_id(&id)?,
            auth.id(),
            with_user,
            params.limit.unwrap_or(100).clamp(1, 500),
        )
        .await
        .map_err(map_chat_error)?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Unread count body
#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub unread: i64,
}

/// Unread message count (`GET /api/messages/unread`)
pub async fn unread(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UnreadResponse>, AppError> {
    let unread = chat_service(&state)
        .unread_count(auth.id())
        .await
        .map_err(map_chat_error)?;

    Ok(Json(UnreadResponse { unread }))
}
