//! Restaurant Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateMenuItemRequest, CreateRestaurantRequest, RestaurantQueryParams,
    UpdateMenuItemRequest, UpdateRestaurantRequest,
};
use crate::application::dto::response::{
    MenuItemResponse, RestaurantDetailResponse, RestaurantResponse,
};
use crate::application::services::{
    CreateMenuItemDto, CreateRestaurantDto, RestaurantError, RestaurantService,
    RestaurantServiceImpl, SubscriptionService, UpdateMenuItemDto, UpdateRestaurantDto,
};
use crate::domain::{PublicationType, RestaurantRepository};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{PgMenuItemRepository, PgRestaurantRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::{parse_currency_field, parse_id};

/// Build the restaurant service from application state.
fn restaurant_service(
    state: &AppState,
) -> RestaurantServiceImpl<PgRestaurantRepository, PgMenuItemRepository> {
    RestaurantServiceImpl::new(
        Arc::new(PgRestaurantRepository::new(state.db.clone())),
        Arc::new(PgMenuItemRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_restaurant_error(error: RestaurantError) -> AppError {
    match error {
        RestaurantError::NotFound => AppError::NotFound("Restaurant not found".into()),
        RestaurantError::MenuItemNotFound => AppError::NotFound("Menu item not found".into()),
        RestaurantError::Forbidden => AppError::Forbidden("Not the restaurant owner".into()),
        RestaurantError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Browse active restaurants (`GET /api/restaurants`)
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<RestaurantQueryParams>,
) -> Result<Json<Vec<RestaurantResponse>>, AppError> {
    let zone_id = params.zone.as_deref().map(parse_id).transpose()?;

    let restaurants = restaurant_service(&state)
        .list(
            zone_id,
            params.limit.unwrap_or(50).clamp(1, 200),
            params.offset.unwrap_or(0).max(0),
        )
        .await
        .map_err(map_restaurant_error)?;

    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

/// The caller's own restaurants, any status (`GET /api/restaurants/mine`)
pub async fn my_restaurants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<RestaurantResponse>>, AppError> {
    let restaurants = PgRestaurantRepository::new(state.db.clone())
        .list_for_owner(auth.id())
        .await?;

    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

/// Fetch a restaurant with its menu (`GET /api/restaurants/{id}`)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantDetailResponse>, AppError> {
    let (restaurant, menu) = restaurant_service(&state)
        .get_with_menu(parse_id(&id)?)
        .await
        .map_err(map_restaurant_error)?;

    Ok(Json(RestaurantDetailResponse {
        restaurant: restaurant.into(),
        menu: menu.into_iter().map(Into::into).collect(),
    }))
}

/// Create a restaurant profile (`POST /api/restaurants`)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let restaurant = restaurant_service(&state)
        .create(
            auth.id(),
            CreateRestaurantDto {
                zone_id: parse_id(&body.zone_id)?,
                name: body.name,
                description: body.description,
                cuisine: body.cuisine,
                address: body.address,
                phone: body.phone,
                whatsapp: body.whatsapp,
                photo_url: body.photo_url,
            },
        )
        .await
        .map_err(map_restaurant_error)?;

    Ok((StatusCode::CREATED, Json(restaurant.into())))
}

/// Update a restaurant (`PATCH /api/restaurants/{id}`)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let restaurant = restaurant_service(&state)
        .update(
            parse_id(&id)?,
            auth.id(),
            auth.user.role,
            UpdateRestaurantDto {
                zone_id: body.zone_id.as_deref().map(parse_id).transpose()?,
                name: body.name,
                description: body.description,
                cuisine: body.cuisine,
                address: body.address,
                phone: body.phone,
                whatsapp: body.whatsapp,
                photo_url: body.photo_url,
            },
        )
        .await
        .map_err(map_restaurant_error)?;

    Ok(Json(restaurant.into()))
}

/// Add a menu item, gated on the plan limit
/// (`POST /api/restaurants/{id}/menu-items`)
pub async fn add_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItemResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let check = super::subscription::subscription_service(&state)
        .check_publication_limit(auth.id(), PublicationType::MenuItem)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    if !check.allowed {
        return Err(AppError::Forbidden(match check.reason {
            Some(reason) => reason.to_string(),
            None => format!("publication limit reached ({}/{})", check.current, check.limit),
        }));
    }

    let item = restaurant_service(&state)
        .add_menu_item(
            parse_id(&id)?,
            auth.id(),
            auth.user.role,
            CreateMenuItemDto {
                name: body.name,
                description: body.description,
                price: body.price,
                currency: parse_currency_field(body.currency.as_deref())?,
                position: body.position,
            },
        )
        .await
        .map_err(map_restaurant_error)?;

    metrics::record_publication(PublicationType::MenuItem.as_str());

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Update a menu item (`PATCH /api/menu-items/{id}`)
pub async fn update_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let item = restaurant_service(&state)
        .update_menu_item(
            parse_id(&id)?,
            auth.id(),
            auth.user.role,
            UpdateMenuItemDto {
                name: body.name,
                description: body.description,
                price: body.price,
                currency: match body.currency.as_deref() {
                    Some(value) => Some(parse_currency_field(Some(value))?),
                    None => None,
                },
                available: body.available,
                position: body.position,
            },
        )
        .await
        .map_err(map_restaurant_error)?;

    Ok(Json(item.into()))
}

/// Remove a menu item (`DELETE /api/menu-items/{id}`)
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    restaurant_service(&state)
        .delete_menu_item(parse_id(&id)?, auth.id(), auth.user.role)
        .await
        .map_err(map_restaurant_error)?;

    Ok(StatusCode::NO_CONTENT)
}
