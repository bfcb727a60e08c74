//! Restaurant entity and repository trait.
//!
//! Maps to the `restaurants` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A restaurant profile browsable by zone.
///
/// Maps to the `restaurants` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - owner_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - zone_id: BIGINT NOT NULL REFERENCES zones(id)
/// - name: VARCHAR(100) NOT NULL
/// - description: TEXT NULL
/// - cuisine: VARCHAR(50) NULL
/// - address: VARCHAR(255) NULL
/// - phone / whatsapp: VARCHAR(30) NULL
/// - photo_url: TEXT NULL
/// - active: BOOLEAN NOT NULL DEFAULT TRUE
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning user account
    pub owner_id: i64,

    pub zone_id: i64,

    pub name: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,

    /// Inactive restaurants are hidden from public browse
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Restaurant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            owner_id: 0,
            zone_id: 0,
            name: String::new(),
            description: None,
            cuisine: None,
            address: None,
            phone: None,
            whatsapp: None,
            photo_url: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for Restaurant data access operations.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Find a restaurant by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError>;

    /// Create a new restaurant.
    async fn create(&self, restaurant: &Restaurant) -> Result<Restaurant, AppError>;

    /// Update an existing restaurant.
    async fn update(&self, restaurant: &Restaurant) -> Result<Restaurant, AppError>;

    /// List active restaurants, optionally filtered by zone.
    async fn list(
        &self,
        zone_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Restaurant>, AppError>;

    /// List restaurants owned by a user (any status).
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Restaurant>, AppError>;

    /// Flip the active flag.
    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError>;
}
