//! Restaurant Service
//!
//! Owner CRUD for restaurant profiles and their menus.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    Currency, MenuItem, MenuItemRepository, Restaurant, RestaurantRepository, UserRole,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Restaurant service trait
#[async_trait]
pub trait RestaurantService: Send + Sync {
    /// Create a restaurant profile for a user.
    async fn create(
        &self,
        owner_id: i64,
        input: CreateRestaurantDto,
    ) -> Result<Restaurant, RestaurantError>;

    /// Fetch an active restaurant with its menu.
    async fn get_with_menu(
        &self,
        restaurant_id: i64,
    ) -> Result<(Restaurant, Vec<MenuItem>), RestaurantError>;

    /// Browse active restaurants, optionally by zone.
    async fn list(
        &self,
        zone_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Restaurant>, RestaurantError>;

    /// Update a restaurant; owner or admin only.
    async fn update(
        &self,
        restaurant_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        update: UpdateRestaurantDto,
    ) -> Result<Restaurant, RestaurantError>;

    /// Add a menu item (the publish handler performs the limit check).
    async fn add_menu_item(
        &self,
        restaurant_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        input: CreateMenuItemDto,
    ) -> Result<MenuItem, RestaurantError>;

    /// Update a menu item; owner or admin only.
    async fn update_menu_item(
        &self,
        item_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        update: UpdateMenuItemDto,
    ) -> Result<MenuItem, RestaurantError>;

    /// Remove a menu item; owner or admin only.
    async fn delete_menu_item(
        &self,
        item_id: i64,
        actor_id: i64,
        actor_role: UserRole,
    ) -> Result<(), RestaurantError>;
}

/// Create restaurant input
#[derive(Debug, Clone)]
pub struct CreateRestaurantDto {
    pub zone_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
}

/// Update restaurant input; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRestaurantDto {
    pub zone_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
}

/// Create menu item input
#[derive(Debug, Clone)]
pub struct CreateMenuItemDto {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: Currency,
    pub position: i32,
}

/// Update menu item input; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMenuItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub available: Option<bool>,
    pub position: Option<i32>,
}

/// Restaurant service errors
#[derive(Debug, thiserror::Error)]
pub enum RestaurantError {
    #[error("Restaurant not found")]
    NotFound,

    #[error("Menu item not found")]
    MenuItemNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// RestaurantService implementation
pub struct RestaurantServiceImpl<R, M>
where
    R: RestaurantRepository,
    M: MenuItemRepository,
{
    restaurant_repo: Arc<R>,
    menu_item_repo: Arc<M>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, M> RestaurantServiceImpl<R, M>
where
    R: RestaurantRepository,
    M: MenuItemRepository,
{
    /// Create a new RestaurantServiceImpl
    pub fn new(
        restaurant_repo: Arc<R>,
        menu_item_repo: Arc<M>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            restaurant_repo,
            menu_item_repo,
            id_generator,
        }
    }

    async fn load_owned(
        &self,
        restaurant_id: i64,
        actor_id: i64,
        actor_role: UserRole,
    ) -> Result<Restaurant, RestaurantError> {
        let restaurant = self
            .restaurant_repo
            .find_by_id(restaurant_id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))?
            .ok_or(RestaurantError::NotFound)?;

        if restaurant.owner_id != actor_id && actor_role != UserRole::Admin {
            return Err(RestaurantError::Forbidden);
        }

        Ok(restaurant)
    }
}

#[async_trait]
impl<R, M> RestaurantService for RestaurantServiceImpl<R, M>
where
    R: RestaurantRepository + 'static,
    M: MenuItemRepository + 'static,
{
    async fn create(
        &self,
        owner_id: i64,
        input: CreateRestaurantDto,
    ) -> Result<Restaurant, RestaurantError> {
        let now = Utc::now();
        let restaurant = Restaurant {
            id: self.id_generator.generate(),
            owner_id,
            zone_id: input.zone_id,
            name: input.name,
            description: input.description,
            cuisine: input.cuisine,
            address: input.address,
            phone: input.phone,
            whatsapp: input.whatsapp,
            photo_url: input.photo_url,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.restaurant_repo
            .create(&restaurant)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }

    async fn get_with_menu(
        &self,
        restaurant_id: i64,
    ) -> Result<(Restaurant, Vec<MenuItem>), RestaurantError> {
        let restaurant = self
            .restaurant_repo
            .find_by_id(restaurant_id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))?
            .filter(|r| r.active)
            .ok_or(RestaurantError::NotFound)?;

        let menu = self
            .menu_item_repo
            .list_for_restaurant(restaurant.id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))?;

        Ok((restaurant, menu))
    }

    async fn list(
        &self,
        zone_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Restaurant>, RestaurantError> {
        self.restaurant_repo
            .list(zone_id, limit, offset)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }

    async fn update(
        &self,
        restaurant_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        update: UpdateRestaurantDto,
    ) -> Result<Restaurant, RestaurantError> {
        let mut restaurant = self.load_owned(restaurant_id, actor_id, actor_role).await?;

        if let Some(zone_id) = update.zone_id {
            restaurant.zone_id = zone_id;
        }
        if let Some(name) = update.name {
            restaurant.name = name;
        }
        if update.description.is_some() {
            restaurant.description = update.description;
        }
        if update.cuisine.is_some() {
            restaurant.cuisine = update.cuisine;
        }
        if update.address.is_some() {
            restaurant.address = update.address;
        }
        if update.phone.is_some() {
            restaurant.phone = update.phone;
        }
        if update.whatsapp.is_some() {
            restaurant.whatsapp = update.whatsapp;
        }
        if update.photo_url.is_some() {
            restaurant.photo_url = update.photo_url;
        }

        self.restaurant_repo
            .update(&restaurant)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }

    async fn add_menu_item(
        &self,
        restaurant_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        input: CreateMenuItemDto,
    ) -> Result<MenuItem, RestaurantError> {
        let restaurant = self.load_owned(restaurant_id, actor_id, actor_role).await?;

        let now = Utc::now();
        let item = MenuItem {
            id: self.id_generator.generate(),
            restaurant_id: restaurant.id,
            name: input.name,
            description: input.description,
            price: input.price,
            currency: input.currency,
            available: true,
            position: input.position,
            created_at: now,
            updated_at: now,
        };

        self.menu_item_repo
            .create(&item)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }

    async fn update_menu_item(
        &self,
        item_id: i64,
        actor_id: i64,
        actor_role: UserRole,
        update: UpdateMenuItemDto,
    ) -> Result<MenuItem, RestaurantError> {
        let mut item = self
            .menu_item_repo
            .find_by_id(item_id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))?
            .ok_or(RestaurantError::MenuItemNotFound)?;

        // Ownership is checked through the restaurant.
        self.load_owned(item.restaurant_id, actor_id, actor_role).await?;

        if let Some(name) = update.name {
            item.name = name;
        }
        if update.description.is_some() {
            item.description = update.description;
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        if let Some(currency) = update.currency {
            item.currency = currency;
        }
        if let Some(available) = update.available {
            item.available = available;
        }
        if let Some(position) = update.position {
            item.position = position;
        }

        self.menu_item_repo
            .update(&item)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }

    async fn delete_menu_item(
        &self,
        item_id: i64,
        actor_id: i64,
        actor_role: UserRole,
    ) -> Result<(), RestaurantError> {
        let item = self
            .menu_item_repo
            .find_by_id(item_id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))?
            .ok_or(RestaurantError::MenuItemNotFound)?;

        self.load_owned(item.restaurant_id, actor_id, actor_role).await?;

        self.menu_item_repo
            .delete(item.id)
            .await
            .map_err(|e| RestaurantError::Internal(e.to_string()))
    }
}
