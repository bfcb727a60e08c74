//! Tenant entity and repository trait.
//!
//! Maps to the `tenants` table. A tenant is a real-estate agency/business
//! namespace: properties belong to a tenant, and agency users carry the
//! tenant's ID on their account.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A real-estate agency namespace.
///
/// Maps to the `tenants` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(100) NOT NULL
/// - slug: VARCHAR(100) NOT NULL UNIQUE
/// - contact_email: VARCHAR(255) NULL
/// - contact_phone: VARCHAR(30) NULL
/// - active: BOOLEAN NOT NULL DEFAULT TRUE
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub name: String,
    pub slug: String,

    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,

    /// Inactive tenants cannot publish and their properties are hidden
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Tenant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            slug: String::new(),
            contact_email: None,
            contact_phone: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for Tenant data access operations.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Find a tenant by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError>;

    /// Find a tenant by slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;

    /// Create a new tenant.
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;

    /// Update an existing tenant.
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError>;

    /// List tenants, optionally restricted to active ones.
    async fn list(&self, active_only: bool) -> Result<Vec<Tenant>, AppError>;

    /// Flip the active flag.
    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError>;
}
