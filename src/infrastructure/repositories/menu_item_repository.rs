//! Menu Item Repository Implementation
//!
//! PostgreSQL implementation of the MenuItemRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Currency, MenuItem, MenuItemRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    currency: String,
    available: bool,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuItemRow {
    fn into_menu_item(self) -> MenuItem {
        MenuItem {
            id: self.id,
            restaurant_id: self.restaurant_id,
            name: self.name,
            description: self.description,
            price: self.price,
            currency: Currency::from_str(&self.currency),
            available: self.available,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const MENU_ITEM_COLUMNS: &str =
    "id, restaurant_id, name, description, price, currency, available, position, \
     created_at, updated_at";

/// PostgreSQL menu item repository implementation.
#[derive(Clone)]
pub struct PgMenuItemRepository {
    pool: PgPool,
}

impl PgMenuItemRepository {
    /// Create a new PgMenuItemRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuItemRepository for PgMenuItemRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<MenuItem>, AppError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_menu_item()))
    }

    async fn create(&self, item: &MenuItem) -> Result<MenuItem, AppError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            r#"
            INSERT INTO menu_items (id, restaurant_id, name, description, price, currency,
                                    available, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MENU_ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(item.restaurant_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.currency.as_str())
        .bind(item.available)
        .bind(item.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_menu_item())
    }

    async fn update(&self, item: &MenuItem) -> Result<MenuItem, AppError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            r#"
            UPDATE menu_items
            SET name = $2,
                description = $3,
                price = $4,
                currency = $5,
                available = $6,
                position = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MENU_ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.currency.as_str())
        .bind(item.available)
        .bind(item.position)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item with id {} not found", item.id)))?;

        Ok(row.into_menu_item())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Menu item with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<MenuItem>, AppError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items \
             WHERE restaurant_id = $1 ORDER BY position, name"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_menu_item()).collect())
    }

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM menu_items mi
            JOIN restaurants r ON r.id = mi.restaurant_id
            WHERE r.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
