//! Listing category entity and repository trait.
//!
//! Maps to the `categories` table. Categories are a fixed, admin-seeded
//! catalog; the bulk importer resolves them by name and never creates new
//! ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A listing category (e.g. "Muebles", "Electrodomésticos").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Display name (unique)
    pub name: String,

    /// URL slug (unique)
    pub slug: String,

    /// Sort position in catalog listings
    pub position: i32,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Category data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find a category by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// Find a category by name, case-insensitively.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    /// List the full catalog ordered by position.
    async fn list_all(&self) -> Result<Vec<Category>, AppError>;

    /// Create a new category (seeding/admin only).
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
}
