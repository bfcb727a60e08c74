//! Subscription Repository Implementation
//!
//! PostgreSQL implementation of the SubscriptionRepository trait. The
//! subscribe flow (subscription + pending payment) is the one write that
//! spans two tables, so it runs inside a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Payment, PaymentStatus, SubscriptionRepository, SubscriptionStatus, UserSubscription,
};
use crate::infrastructure::database::with_transaction;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: i64,
    plan_id: i64,
    status: String,
    started_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubscriptionRow {
    fn into_subscription(self) -> UserSubscription {
        UserSubscription {
            id: self.id,
            user_id: self.user_id,
            plan_id: self.plan_id,
            status: SubscriptionStatus::from_str(&self.status),
            started_at: self.started_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan_id, status, started_at, expires_at, created_at, updated_at";

const INSERT_SUBSCRIPTION: &str = r#"
    INSERT INTO user_subscriptions (id, user_id, plan_id, status, started_at, expires_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, user_id, plan_id, status, started_at, expires_at, created_at, updated_at
"#;

/// PostgreSQL subscription repository implementation.
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new PgSubscriptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserSubscription>, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM user_subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_subscription()))
    }

    async fn find_active_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<UserSubscription>, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS} FROM user_subscriptions
            WHERE user_id = $1
              AND status = 'active'
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY started_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_subscription()))
    }

    async fn create(
        &self,
        subscription: &UserSubscription,
    ) -> Result<UserSubscription, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(INSERT_SUBSCRIPTION)
            .bind(subscription.id)
            .bind(subscription.user_id)
            .bind(subscription.plan_id)
            .bind(subscription.status.as_str())
            .bind(subscription.started_at)
            .bind(subscription.expires_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into_subscription())
    }

    async fn create_with_payment(
        &self,
        subscription: &UserSubscription,
        payment: &Payment,
    ) -> Result<(UserSubscription, Payment), AppError> {
        let subscription = subscription.clone();
        let payment = payment.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let sub_row = sqlx::query_as::<_, SubscriptionRow>(INSERT_SUBSCRIPTION)
                    .bind(subscription.id)
                    .bind(subscription.user_id)
                    .bind(subscription.plan_id)
                    .bind(subscription.status.as_str())
                    .bind(subscription.started_at)
                    .bind(subscription.expires_at)
                    .fetch_one(&mut **tx)
                    .await?;

                let pay_row = sqlx::query_as::<_, super::payment_repository::PaymentRow>(
                    r#"
                    INSERT INTO payments (id, user_id, subscription_id, amount, currency,
                                          method, reference, status)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    RETURNING id, user_id, subscription_id, amount, currency, method,
                              reference, status, created_at, updated_at
                    "#,
                )
                .bind(payment.id)
                .bind(payment.user_id)
                .bind(payment.subscription_id)
                .bind(payment.amount)
                .bind(payment.currency.as_str())
                .bind(&payment.method)
                .bind(&payment.reference)
                .bind(PaymentStatus::Pending.as_str())
                .fetch_one(&mut **tx)
                .await?;

                Ok((sub_row.into_subscription(), pay_row.into_payment()))
            })
        })
        .await
    }

    async fn update(
        &self,
        subscription: &UserSubscription,
    ) -> Result<UserSubscription, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            UPDATE user_subscriptions
            SET status = $2,
                started_at = $3,
                expires_at = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(subscription.id)
        .bind(subscription.status.as_str())
        .bind(subscription.started_at)
        .bind(subscription.expires_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Subscription with id {} not found",
                subscription.id
            ))
        })?;

        Ok(row.into_subscription())
    }

    async fn cancel_others_for_user(&self, user_id: i64, keep_id: i64) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_subscriptions
            SET status = 'cancelled', updated_at = NOW()
            WHERE user_id = $1
              AND id <> $2
              AND status IN ('active', 'pending')
            "#,
        )
        .bind(user_id)
        .bind(keep_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    async fn expire_overdue(&self) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_subscriptions
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'active'
              AND expires_at IS NOT NULL
              AND expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }
}
