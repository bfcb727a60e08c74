//! Lead entity and repository trait.
//!
//! Maps to the `leads` table: contact inquiries visitors leave against a
//! property, handled by the owning agency.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Lead handling status, matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

impl LeadStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "contacted" => Self::Contacted,
            "closed" => Self::Closed,
            _ => Self::New,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }
}

/// A visitor inquiry about a property.
///
/// Maps to the `leads` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tenant_id: BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE
/// - property_id: BIGINT NOT NULL REFERENCES properties(id) ON DELETE CASCADE
/// - name: VARCHAR(100) NOT NULL
/// - email: VARCHAR(255) NULL
/// - phone: VARCHAR(30) NULL
/// - message: TEXT NOT NULL
/// - status: VARCHAR(10) CHECK (status IN ('new','contacted','closed'))
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub tenant_id: i64,
    pub property_id: i64,

    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,

    pub status: LeadStatus,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Lead data access operations.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Find a lead by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, AppError>;

    /// Create a new lead.
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError>;

    /// List a tenant's leads, newest first, optionally filtered by status.
    async fn list_for_tenant(
        &self,
        tenant_id: i64,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, AppError>;

    /// Update the handling status.
    async fn set_status(&self, id: i64, status: LeadStatus) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Closed] {
            assert_eq!(LeadStatus::from_str(status.as_str()), status);
        }
    }
}
