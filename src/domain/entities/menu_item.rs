//! Menu item entity and repository trait.
//!
//! Maps to the `menu_items` table. Menu items are the store products of
//! the marketplace: creating one is subject to the plan limit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Currency;
use crate::shared::error::AppError;

/// A dish/product on a restaurant's menu.
///
/// Maps to the `menu_items` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - restaurant_id: BIGINT NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE
/// - name: VARCHAR(100) NOT NULL
/// - description: TEXT NULL
/// - price: NUMERIC(12,2) NOT NULL
/// - currency: VARCHAR(3) NOT NULL
/// - available: BOOLEAN NOT NULL DEFAULT TRUE
/// - position: INT NOT NULL DEFAULT 0
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub restaurant_id: i64,

    pub name: String,
    pub description: Option<String>,

    pub price: Decimal,
    pub currency: Currency,

    /// Unavailable items stay on the menu but are greyed out
    pub available: bool,

    /// Sort position within the menu
    pub position: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for MenuItem {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            restaurant_id: 0,
            name: String::new(),
            description: None,
            price: Decimal::ZERO,
            currency: Currency::default(),
            available: true,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for MenuItem data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    /// Find a menu item by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<MenuItem>, AppError>;

    /// Create a new menu item.
    async fn create(&self, item: &MenuItem) -> Result<MenuItem, AppError>;

    /// Update an existing menu item.
    async fn update(&self, item: &MenuItem) -> Result<MenuItem, AppError>;

    /// Hard delete a menu item.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// List a restaurant's menu ordered by position.
    async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<MenuItem>, AppError>;

    /// Count menu items across all restaurants owned by a user
    /// (plan-limit check).
    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, AppError>;
}
