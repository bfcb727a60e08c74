//! Tenant Repository Implementation
//!
//! PostgreSQL implementation of the TenantRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Tenant, TenantRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: i64,
    name: String,
    slug: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self) -> Tenant {
        Tenant {
            id: self.id,
            name: self.name,
            slug: self.slug,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const TENANT_COLUMNS: &str =
    "id, name, slug, contact_email, contact_phone, active, created_at, updated_at";

/// PostgreSQL tenant repository implementation.
#[derive(Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    /// Create a new PgTenantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_tenant()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_tenant()))
    }

    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            r#"
            INSERT INTO tenants (id, name, slug, contact_email, contact_phone, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.slug)
        .bind(&tenant.contact_email)
        .bind(&tenant.contact_phone)
        .bind(tenant.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Tenant with slug '{}' already exists", tenant.slug))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_tenant())
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            r#"
            UPDATE tenants
            SET name = $2,
                contact_email = $3,
                contact_phone = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.contact_email)
        .bind(&tenant.contact_phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant with id {} not found", tenant.id)))?;

        Ok(row.into_tenant())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Tenant>, AppError> {
        let rows = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE ($1 = FALSE OR active) ORDER BY name"
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_tenant()).collect())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tenants SET active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tenant with id {} not found", id)));
        }

        Ok(())
    }
}
