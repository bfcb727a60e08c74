//! Restaurant Repository Implementation
//!
//! PostgreSQL implementation of the RestaurantRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Restaurant, RestaurantRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    owner_id: i64,
    zone_id: i64,
    name: String,
    description: Option<String>,
    cuisine: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    whatsapp: Option<String>,
    photo_url: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RestaurantRow {
    fn into_restaurant(self) -> Restaurant {
        Restaurant {
            id: self.id,
            owner_id: self.owner_id,
            zone_id: self.zone_id,
            name: self.name,
            description: self.description,
            cuisine: self.cuisine,
            address: self.address,
            phone: self.phone,
            whatsapp: self.whatsapp,
            photo_url: self.photo_url,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const RESTAURANT_COLUMNS: &str =
    "id, owner_id, zone_id, name, description, cuisine, address, phone, whatsapp, \
     photo_url, active, created_at, updated_at";

/// PostgreSQL restaurant repository implementation.
#[derive(Clone)]
pub struct PgRestaurantRepository {
    pool: PgPool,
}

impl PgRestaurantRepository {
    /// Create a new PgRestaurantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_restaurant()))
    }

    async fn create(&self, restaurant: &Restaurant) -> Result<Restaurant, AppError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            r#"
            INSERT INTO restaurants (id, owner_id, zone_id, name, description, cuisine,
                                     address, phone, whatsapp, photo_url, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {RESTAURANT_COLUMNS}
            "#
        ))
        .bind(restaurant.id)
        .bind(restaurant.owner_id)
        .bind(restaurant.zone_id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.cuisine)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(&restaurant.whatsapp)
        .bind(&restaurant.photo_url)
        .bind(restaurant.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_restaurant())
    }

    async fn update(&self, restaurant: &Restaurant) -> Result<Restaurant, AppError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            r#"
            UPDATE restaurants
            SET zone_id = $2,
                name = $3,
                description = $4,
                cuisine = $5,
                address = $6,
                phone = $7,
                whatsapp = $8,
                photo_url = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RESTAURANT_COLUMNS}
            "#
        ))
        .bind(restaurant.id)
        .bind(restaurant.zone_id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.cuisine)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(&restaurant.whatsapp)
        .bind(&restaurant.photo_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Restaurant with id {} not found", restaurant.id))
        })?;

        Ok(row.into_restaurant())
    }

    async fn list(
        &self,
        zone_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Restaurant>, AppError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS} FROM restaurants
            WHERE active AND ($1::bigint IS NULL OR zone_id = $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(zone_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_restaurant()).collect())
    }

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Restaurant>, AppError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE owner_id = $1 ORDER BY name"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_restaurant()).collect())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE restaurants SET active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Restaurant with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
