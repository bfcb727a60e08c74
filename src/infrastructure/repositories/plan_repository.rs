//! Plan Repository Implementation
//!
//! PostgreSQL implementation of the PlanRepository trait over the static
//! plan catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Currency, Plan, PlanRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    code: String,
    name: String,
    price: Decimal,
    currency: String,
    max_listings: i32,
    max_properties: i32,
    max_menu_items: i32,
    created_at: DateTime<Utc>,
}

impl PlanRow {
    fn into_plan(self) -> Plan {
        Plan {
            id: self.id,
            code: self.code,
            name: self.name,
            price: self.price,
            currency: Currency::from_str(&self.currency),
            max_listings: self.max_listings,
            max_properties: self.max_properties,
            max_menu_items: self.max_menu_items,
            created_at: self.created_at,
        }
    }
}

const PLAN_COLUMNS: &str =
    "id, code, name, price, currency, max_listings, max_properties, max_menu_items, created_at";

/// PostgreSQL plan repository implementation.
#[derive(Clone)]
pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    /// Create a new PgPlanRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Plan>, AppError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_plan()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Plan>, AppError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_plan()))
    }

    async fn list_all(&self) -> Result<Vec<Plan>, AppError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans ORDER BY price"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_plan()).collect())
    }
}
