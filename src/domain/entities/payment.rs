//! Payment entity and repository trait.
//!
//! Maps to the `payments` table. Payments are plain records: an admin
//! confirms or rejects them, there is no gateway integration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Currency;
use crate::shared::error::AppError;

/// Payment status, matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Rejected,
}

impl PaymentStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "paid" => Self::Paid,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Rejected => "rejected",
        }
    }
}

/// A subscription payment record.
///
/// Maps to the `payments` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - subscription_id: BIGINT NOT NULL REFERENCES user_subscriptions(id) ON DELETE CASCADE
/// - amount: NUMERIC(12,2) NOT NULL
/// - currency: VARCHAR(3) NOT NULL
/// - method: VARCHAR(30) NULL (e.g. 'transfer', 'mercadopago')
/// - reference: VARCHAR(100) NULL (external receipt/operation id)
/// - status: VARCHAR(10) CHECK (status IN ('pending','paid','rejected'))
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub user_id: i64,
    pub subscription_id: i64,

    pub amount: Decimal,
    pub currency: Currency,

    pub method: Option<String>,
    pub reference: Option<String>,

    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Payment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: 0,
            subscription_id: 0,
            amount: Decimal::ZERO,
            currency: Currency::default(),
            method: None,
            reference: None,
            status: PaymentStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for Payment data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError>;

    /// List a user's payments, newest first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Payment>, AppError>;

    /// List payments by status (admin review queue).
    async fn list_by_status(
        &self,
        status: PaymentStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, AppError>;

    /// Update the payment status. Returns the updated row.
    async fn set_status(&self, id: i64, status: PaymentStatus) -> Result<Payment, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Rejected,
        ] {
            assert_eq!(PaymentStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::from_str("refunded"), PaymentStatus::Pending);
    }
}
