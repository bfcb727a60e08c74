//! Lead Repository Implementation
//!
//! PostgreSQL implementation of the LeadRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Lead, LeadRepository, LeadStatus};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: i64,
    tenant_id: i64,
    property_id: i64,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self) -> Lead {
        Lead {
            id: self.id,
            tenant_id: self.tenant_id,
            property_id: self.property_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            status: LeadStatus::from_str(&self.status),
            created_at: self.created_at,
        }
    }
}

const LEAD_COLUMNS: &str =
    "id, tenant_id, property_id, name, email, phone, message, status, created_at";

/// PostgreSQL lead repository implementation.
#[derive(Clone)]
pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    /// Create a new PgLeadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PgLeadRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, AppError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_lead()))
    }

    async fn create(&self, lead: &Lead) -> Result<Lead, AppError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            r#"
            INSERT INTO leads (id, tenant_id, property_id, name, email, phone, message, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(lead.id)
        .bind(lead.tenant_id)
        .bind(lead.property_id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.message)
        .bind(lead.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_lead())
    }

    async fn list_for_tenant(
        &self,
        tenant_id: i64,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, AppError> {
        let rows = sqlx::query_as::<_, LeadRow>(&format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM leads
            WHERE tenant_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(tenant_id)
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_lead()).collect())
    }

    async fn set_status(&self, id: i64, status: LeadStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE leads SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lead with id {} not found", id)));
        }

        Ok(())
    }
}
