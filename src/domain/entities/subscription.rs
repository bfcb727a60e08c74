//! Plan and subscription entities with their repository traits.
//!
//! Maps to the `plans` and `user_subscriptions` tables. Plans are a
//! static catalog; each plan row carries a per-publication-type ceiling
//! where `-1` means unlimited.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::Payment;
use crate::domain::value_objects::Currency;
use crate::shared::error::AppError;

/// The limit is unlimited when a plan column holds this value.
pub const UNLIMITED: i32 = -1;

/// What is being published, for limit accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationType {
    Listing,
    Property,
    MenuItem,
}

impl PublicationType {
    /// Convert from wire/database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "listing" => Some(Self::Listing),
            "property" => Some(Self::Property),
            "menu_item" => Some(Self::MenuItem),
            _ => None,
        }
    }

    /// Convert to wire/database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Property => "property",
            Self::MenuItem => "menu_item",
        }
    }
}

/// A subscription plan row from the static catalog.
///
/// Maps to the `plans` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - code: VARCHAR(20) NOT NULL UNIQUE ('free','pro','premium')
/// - name: VARCHAR(50) NOT NULL
/// - price: NUMERIC(12,2) NOT NULL
/// - currency: VARCHAR(3) NOT NULL
/// - max_listings / max_properties / max_menu_items: INT NOT NULL (-1 = unlimited)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Stable code used by clients ('free', 'pro', 'premium')
    pub code: String,

    pub name: String,

    /// Monthly price; zero for the free tier
    pub price: Decimal,
    pub currency: Currency,

    pub max_listings: i32,
    pub max_properties: i32,
    pub max_menu_items: i32,

    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Resolve the ceiling for a publication type.
    pub fn limit_for(&self, publication_type: PublicationType) -> i32 {
        match publication_type {
            PublicationType::Listing => self.max_listings,
            PublicationType::Property => self.max_properties,
            PublicationType::MenuItem => self.max_menu_items,
        }
    }

    /// Whether the plan is free of charge.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// Subscription lifecycle, matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created, waiting for the payment to be confirmed
    Pending,
    #[default]
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "expired" => Self::Expired,
            "cancelled" => Self::Cancelled,
            _ => Self::Active,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A user's subscription to a plan.
///
/// Maps to the `user_subscriptions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - plan_id: BIGINT NOT NULL REFERENCES plans(id)
/// - status: VARCHAR(10) CHECK (status IN ('pending','active','expired','cancelled'))
/// - started_at: TIMESTAMPTZ NOT NULL
/// - expires_at: TIMESTAMPTZ NULL (NULL = never, free tier)
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscription {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub user_id: i64,
    pub plan_id: i64,

    pub status: SubscriptionStatus,

    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSubscription {
    /// Check if the subscription currently grants publishing rights.
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
            && self.expires_at.map(|e| e > Utc::now()).unwrap_or(true)
    }
}

impl Default for UserSubscription {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: 0,
            plan_id: 0,
            status: SubscriptionStatus::default(),
            started_at: now,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for the static plan catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Find a plan by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Plan>, AppError>;

    /// Find a plan by its stable code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Plan>, AppError>;

    /// List the whole catalog ordered by price.
    async fn list_all(&self) -> Result<Vec<Plan>, AppError>;
}

/// Repository trait for UserSubscription data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserSubscription>, AppError>;

    /// Find the user's current active subscription, if any.
    async fn find_active_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<UserSubscription>, AppError>;

    /// Create a subscription on its own (free tier, no payment).
    async fn create(&self, subscription: &UserSubscription)
        -> Result<UserSubscription, AppError>;

    /// Create a subscription together with its pending payment in one
    /// transaction (paid tiers).
    async fn create_with_payment(
        &self,
        subscription: &UserSubscription,
        payment: &Payment,
    ) -> Result<(UserSubscription, Payment), AppError>;

    /// Update status/expiry of an existing subscription.
    async fn update(&self, subscription: &UserSubscription)
        -> Result<UserSubscription, AppError>;

    /// Cancel every active or pending subscription of a user except one.
    async fn cancel_others_for_user(&self, user_id: i64, keep_id: i64)
        -> Result<i64, AppError>;

    /// Mark overdue active subscriptions expired. Returns rows affected.
    async fn expire_overdue(&self) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    fn plan(max_listings: i32) -> Plan {
        Plan {
            id: 1,
            code: "free".into(),
            name: "Free".into(),
            price: Decimal::ZERO,
            currency: Currency::Uyu,
            max_listings,
            max_properties: 1,
            max_menu_items: 10,
            created_at: Utc::now(),
        }
    }

    #[test_case("listing", Some(PublicationType::Listing))]
    #[test_case("property", Some(PublicationType::Property))]
    #[test_case("menu_item", Some(PublicationType::MenuItem))]
    #[test_case("store_product", None)]
    #[test_case("", None)]
    fn test_publication_type_from_str(input: &str, expected: Option<PublicationType>) {
        assert_eq!(PublicationType::from_str(input), expected);
    }

    #[test]
    fn test_limit_for_resolves_per_type() {
        let plan = plan(5);
        assert_eq!(plan.limit_for(PublicationType::Listing), 5);
        assert_eq!(plan.limit_for(PublicationType::Property), 1);
        assert_eq!(plan.limit_for(PublicationType::MenuItem), 10);
    }

    #[test]
    fn test_is_free() {
        assert!(plan(5).is_free());
    }

    #[test]
    fn test_subscription_without_expiry_is_active() {
        let sub = UserSubscription::default();
        assert!(sub.is_active());
    }

    #[test]
    fn test_expired_subscription_is_not_active() {
        let sub = UserSubscription {
            expires_at: Some(Utc::now() - Duration::days(1)),
            ..Default::default()
        };
        assert!(!sub.is_active());
    }

    #[test]
    fn test_pending_subscription_is_not_active() {
        let sub = UserSubscription {
            status: SubscriptionStatus::Pending,
            ..Default::default()
        };
        assert!(!sub.is_active());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(SubscriptionStatus::from_str(status.as_str()), status);
        }
    }
}
