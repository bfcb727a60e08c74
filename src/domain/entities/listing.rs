//! Classified listing entity and repository trait.
//!
//! Maps to the `listings` table, the core marketplace table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Currency;
use crate::shared::error::AppError;

/// Item condition enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingCondition {
    New,
    #[default]
    Used,
}

impl ListingCondition {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "new" => Self::New,
            _ => Self::Used,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Used => "used",
        }
    }
}

/// Listing status enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Paused,
    Sold,
    Deleted,
}

impl ListingStatus {
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

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a classified ad.
///
/// Maps to the `listings` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - category_id: BIGINT NOT NULL REFERENCES categories(id)
/// - zone_id: BIGINT NOT NULL REFERENCES zones(id)
/// - title: VARCHAR(120) NOT NULL
/// - description: TEXT NOT NULL DEFAULT ''
/// - price: NUMERIC(12,2) NOT NULL
/// - currency: VARCHAR(3) NOT NULL CHECK (currency IN ('UYU','USD'))
/// - condition: VARCHAR(10) NOT NULL CHECK (condition IN ('new','used'))
/// - status: VARCHAR(10) NOT NULL CHECK (status IN ('active','paused','sold','deleted'))
/// - whatsapp/phone/email/instagram: contact columns, all NULL-able
/// - photo_urls: TEXT[] NOT NULL DEFAULT '{}'
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owner
    pub user_id: i64,

    pub category_id: i64,
    pub zone_id: i64,

    pub title: String,
    pub description: String,

    pub price: Decimal,
    pub currency: Currency,
    pub condition: ListingCondition,
    pub status: ListingStatus,

    /// Contact channels shown on the ad
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,

    /// Photo URLs, primary first
    pub photo_urls: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Check if the ad is publicly visible.
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Check if the ad has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.status == ListingStatus::Deleted
    }
}

impl Default for Listing {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: 0,
            category_id: 0,
            zone_id: 0,
            title: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            currency: Currency::default(),
            condition: ListingCondition::default(),
            status: ListingStatus::default(),
            whatsapp: None,
            phone: None,
            email: None,
            instagram: None,
            photo_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public search filter over active listings.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub zone_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Case-insensitive substring over title and description
    pub text: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository trait for Listing data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Find a listing by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError>;

    /// Create a new listing.
    async fn create(&self, listing: &Listing) -> Result<Listing, AppError>;

    /// Update mutable fields of an existing listing.
    async fn update(&self, listing: &Listing) -> Result<Listing, AppError>;

    /// Change the status (pause/sold/soft delete).
    async fn set_status(&self, id: i64, status: ListingStatus) -> Result<(), AppError>;

    /// Search active listings with filters and pagination.
    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, AppError>;

    /// Count active listings matching a filter (for pagination totals).
    async fn count_search(&self, filter: &ListingFilter) -> Result<i64, AppError>;

    /// Count active listings owned by a user (plan-limit check).
    async fn count_active_for_user(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("new", ListingCondition::New ; "lowercase new")]
    #[test_case("NEW", ListingCondition::New ; "uppercase new")]
    #[test_case("used", ListingCondition::Used)]
    #[test_case("whatever", ListingCondition::Used)]
    fn test_condition_from_str(input: &str, expected: ListingCondition) {
        assert_eq!(ListingCondition::from_str(input), expected);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ListingStatus::Active,
            ListingStatus::Paused,
            ListingStatus::Sold,
            ListingStatus::Deleted,
        ] {
            assert_eq!(ListingStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_is_active() {
        let mut listing = Listing::default();
        assert!(listing.is_active());

        listing.status = ListingStatus::Sold;
        assert!(!listing.is_active());

        listing.status = ListingStatus::Deleted;
        assert!(listing.is_deleted());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let listing = Listing {
            status: ListingStatus::Paused,
            ..Default::default()
        };
        let serialized = serde_json::to_string(&listing).unwrap();
        assert!(serialized.contains("\"status\":\"paused\""));
    }
}
