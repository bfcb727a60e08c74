//! Payment Repository Implementation
//!
//! PostgreSQL implementation of the PaymentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Currency, Payment, PaymentRepository, PaymentStatus};
use crate::shared::error::AppError;

/// Database row representation matching the payments table schema.
/// Visible to the subscription repository for the transactional insert.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentRow {
    id: i64,
    user_id: i64,
    subscription_id: i64,
    amount: Decimal,
    currency: String,
    method: Option<String>,
    reference: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    pub(super) fn into_payment(self) -> Payment {
        Payment {
            id: self.id,
            user_id: self.user_id,
            subscription_id: self.subscription_id,
            amount: self.amount,
            currency: Currency::from_str(&self.currency),
            method: self.method,
            reference: self.reference,
            status: PaymentStatus::from_str(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const PAYMENT_COLUMNS: &str =
    "id, user_id, subscription_id, amount, currency, method, reference, status, \
     created_at, updated_at";

/// PostgreSQL payment repository implementation.
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new PgPaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_payment()))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_payment()).collect())
    }

    async fn list_by_status(
        &self,
        status: PaymentStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE status = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_payment()).collect())
    }

    async fn set_status(&self, id: i64, status: PaymentStatus) -> Result<Payment, AppError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            UPDATE payments
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", id)))?;

        Ok(row.into_payment())
    }
}
