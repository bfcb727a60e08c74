//! Real-estate property entity and repository trait.
//!
//! Maps to the `properties` table. Properties are published by agency
//! users on behalf of their tenant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Currency;
use crate::shared::error::AppError;

/// Sale vs. rent, matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    #[default]
    Sale,
    Rent,
}

impl OperationType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rent" => Self::Rent,
            _ => Self::Sale,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }
}

/// Property kind, matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Land,
    Commercial,
}

impl PropertyType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "house" => Self::House,
            "land" => Self::Land,
            "commercial" => Self::Commercial,
            _ => Self::Apartment,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Land => "land",
            Self::Commercial => "commercial",
        }
    }
}

/// Property status, same lifecycle as listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Active,
    Paused,
    Sold,
    Deleted,
}

impl PropertyStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "paused" => Self::Paused,
            "sold" => Self::Sold,
            "deleted" => Self::Deleted,
            _ => Self::Active,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Sold => "sold",
            Self::Deleted => "deleted",
        }
    }
}

/// Represents a real-estate publication.
///
/// Maps to the `properties` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tenant_id: BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE
/// - created_by: BIGINT NOT NULL REFERENCES users(id)
/// - zone_id: BIGINT NOT NULL REFERENCES zones(id)
/// - operation: VARCHAR(10) CHECK (operation IN ('sale','rent'))
/// - property_type: VARCHAR(20) CHECK (property_type IN
///   ('apartment','house','land','commercial'))
/// - price NUMERIC(12,2), currency VARCHAR(3)
/// - bedrooms/bathrooms: INT NULL, area_m2: NUMERIC(8,1) NULL
/// - address: VARCHAR(255) NULL
/// - photo_urls: TEXT[] NOT NULL DEFAULT '{}'
/// - status + timestamps as listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Agency that owns the publication
    pub tenant_id: i64,

    /// Agency user who created it (plan limits are counted per user)
    pub created_by: i64,

    pub zone_id: i64,

    pub title: String,
    pub description: String,

    pub operation: OperationType,
    pub property_type: PropertyType,

    pub price: Decimal,
    pub currency: Currency,

    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub address: Option<String>,

    pub photo_urls: Vec<String>,

    pub status: PropertyStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Check if the publication is publicly visible.
    pub fn is_active(&self) -> bool {
        self.status == PropertyStatus::Active
    }
}

impl Default for Property {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            tenant_id: 0,
            created_by: 0,
            zone_id: 0,
            title: String::new(),
            description: String::new(),
            operation: OperationType::default(),
            property_type: PropertyType::default(),
            price: Decimal::ZERO,
            currency: Currency::default(),
            bedrooms: None,
            bathrooms: None,
            area_m2: None,
            address: None,
            photo_urls: Vec::new(),
            status: PropertyStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public search filter over active properties.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub operation: Option<OperationType>,
    pub property_type: Option<PropertyType>,
    pub zone_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_bedrooms: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository trait for Property data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Find a property by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Property>, AppError>;

    /// Create a new property.
    async fn create(&self, property: &Property) -> Result<Property, AppError>;

    /// Update mutable fields of an existing property.
    async fn update(&self, property: &Property) -> Result<Property, AppError>;

    /// Change the status (pause/sold/soft delete).
    async fn set_status(&self, id: i64, status: PropertyStatus) -> Result<(), AppError>;

    /// Search active properties with filters and pagination.
    async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, AppError>;

    /// Count active properties matching a filter.
    async fn count_search(&self, filter: &PropertyFilter) -> Result<i64, AppError>;

    /// Count active properties created by a user (plan-limit check).
    async fn count_active_for_user(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_roundtrip() {
        for op in [OperationType::Sale, OperationType::Rent] {
            assert_eq!(OperationType::from_str(op.as_str()), op);
        }
    }

    #[test]
    fn test_property_type_roundtrip() {
        for pt in [
            PropertyType::Apartment,
            PropertyType::House,
            PropertyType::Land,
            PropertyType::Commercial,
        ] {
            assert_eq!(PropertyType::from_str(pt.as_str()), pt);
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PropertyStatus::Active,
            PropertyStatus::Paused,
            PropertyStatus::Sold,
            PropertyStatus::Deleted,
        ] {
            assert_eq!(PropertyStatus::from_str(status.as_str()), status);
        }
    }
}
