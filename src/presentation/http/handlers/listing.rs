//! Listing Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateListingRequest, ListingQueryParams, UpdateListingRequest, UpdateStatusRequest,
};
use crate::application::dto::response::{ListingListResponse, ListingResponse};
use crate::application::services::{
    Actor, CreateListingDto, ListingError, ListingService, ListingServiceImpl,
    SubscriptionService, UpdateListingDto,
};
use crate::domain::{
    ListingCondition, ListingFilter, ListingStatus, PublicationType,
};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::PgListingRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::{parse_currency_field, parse_id};

/// Build the listing service from application state.
fn listing_service(state: &AppState) -> ListingServiceImpl<PgListingRepository> {
    ListingServiceImpl::new(
        Arc::new(PgListingRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_listing_error(error: ListingError) -> AppError {
    match error {
        ListingError::NotFound => AppError::NotFound("Listing not found".into()),
        ListingError::Forbidden => AppError::Forbidden("Not the listing owner".into()),
        ListingError::Internal(msg) => AppError::Internal(msg),
    }
}

fn actor(auth: &AuthUser) -> Actor {
    Actor {
        user_id: auth.user.id,
        role: auth.user.role,
    }
}

/// Statuses a client may set directly; deletion goes through DELETE.
fn parse_status(value: &str) -> Result<ListingStatus, AppError> {
    match value {
        "active" => Ok(ListingStatus::Active),
        "paused" => Ok(ListingStatus::Paused),
        "sold" => Ok(ListingStatus::Sold),
        other => Err(AppError::BadRequest(format!("invalid status '{}'", other))),
    }
}

/// Search active listings (`GET /api/listings`)
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ListingQueryParams>,
) -> Result<Json<ListingListResponse>, AppError> {
    let filter = ListingFilter {
        zone_id: params.zone.as_deref().map(parse_id).transpose()?,
        category_id: params.category.as_deref().map(parse_id).transpose()?,
        text: params.q,
        min_price: params.min_price,
        max_price: params.max_price,
        limit: params.limit.unwrap_or(20).clamp(1, 100),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let (items, total) = listing_service(&state)
        .search(filter)
        .await
        .map_err(map_listing_error)?;

    Ok(Json(ListingListResponse {
        items: items.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Fetch one listing (`GET /api/listings/{id}`)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, AppError> {
    let listing = listing_service(&state)
        .get(parse_id(&id)?)
        .await
        .map_err(map_listing_error)?;

    Ok(Json(listing.into()))
}

/// Publish a listing, gated on the plan limit (`POST /api/publish/listing`)
pub async fn publish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let check = super::subscription::subscription_service(&state)
        .check_publication_limit(auth.id(), PublicationType::Listing)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    if !check.allowed {
        return Err(AppError::Forbidden(match check.reason {
            Some(reason) => reason.to_string(),
            None => format!("publication limit reached ({}/{})", check.current, check.limit),
        }));
    }

    let listing = listing_service(&state)
        .create(CreateListingDto {
            user_id: auth.id(),
            category_id: parse_id(&body.category_id)?,
            zone_id: parse_id(&body.zone_id)?,
            title: body.title,
            description: body.description.unwrap_or_default(),
            price: body.price,
            currency: parse_currency_field(body.currency.as_deref())?,
            condition: body
                .condition
                .as_deref()
                .map(ListingCondition::from_str)
                .unwrap_or_default(),
            whatsapp: body.whatsapp,
            phone: body.phone,
            email: body.email,
            instagram: body.instagram,
            photo_urls: body.photo_urls,
        })
        .await
        .map_err(map_listing_error)?;

    metrics::record_publication(PublicationType::Listing.as_str());

    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// Update a listing (`PATCH /api/listings/{id}`)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<ListingResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = UpdateListingDto {
        category_id: body.category_id.as_deref().map(parse_id).transpose()?,
        zone_id: body.zone_id.as_deref().map(parse_id).transpose()?,
        title: body.title,
        description: body.description,
        price: body.price,
        currency: match body.currency.as_deref() {
            Some(value) => Some(parse_currency_field(Some(value))?),
            None => None,
        },
        condition: body.condition.as_deref().map(ListingCondition::from_str),
        whatsapp: body.whatsapp,
        phone: body.phone,
        email: body.email,
        instagram: body.instagram,
        photo_urls: body.photo_urls,
    };

    let listing = listing_service(&state)
        .update(parse_id(&id)?, actor(&auth), update)
        .await
        .map_err(map_listing_error)?;

    Ok(Json(listing.into()))
}

/// Pause/reactivate/mark sold (`PATCH /api/listings/{id}/status`)
pub async fn set_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    listing_service(&state)
        .set_status(parse_id(&id)?, actor(&auth), parse_status(&body.status)?)
        .await
        .map_err(map_listing_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft delete (`DELETE /api/listings/{id}`)
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    listing_service(&state)
        .delete(parse_id(&id)?, actor(&auth))
        .await
        .map_err(map_listing_error)?;

    Ok(StatusCode::NO_CONTENT)
}
