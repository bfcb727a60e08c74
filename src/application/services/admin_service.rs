//! Admin Service
//!
//! User moderation, tenant management, and the payment review queue.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    slugify, Payment, PaymentRepository, PaymentStatus, SessionRepository, Tenant,
    TenantRepository, User, UserQuery, UserRepository, UserStatus,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Admin service trait
#[async_trait]
pub trait AdminService: Send + Sync {
    /// List/search users for the admin panel.
    async fn list_users(&self, query: UserQuery) -> Result<(Vec<User>, i64), AdminError>;

    /// Suspend or restore an account; suspension revokes open sessions.
    async fn set_user_status(&self, user_id: i64, status: UserStatus)
        -> Result<(), AdminError>;

    /// Hard delete an account and everything cascading from it.
    async fn delete_user(&self, user_id: i64) -> Result<(), AdminError>;

    /// Payments awaiting review.
    async fn list_payments(
        &self,
        status: PaymentStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, AdminError>;

    /// Create a real-estate agency namespace.
    async fn create_tenant(&self, input: CreateTenantDto) -> Result<Tenant, AdminError>;

    /// Update an agency's contact details.
    async fn update_tenant(
        &self,
        tenant_id: i64,
        update: UpdateTenantDto,
    ) -> Result<Tenant, AdminError>;

    /// List agencies.
    async fn list_tenants(&self, active_only: bool) -> Result<Vec<Tenant>, AdminError>;

    /// Activate/deactivate an agency.
    async fn set_tenant_active(&self, tenant_id: i64, active: bool) -> Result<(), AdminError>;
}

/// Create tenant input
#[derive(Debug, Clone)]
pub struct CreateTenantDto {
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Update tenant input; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTenantDto {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Admin service errors
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("User not found")]
    UserNotFound,

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AdminService implementation
pub struct AdminServiceImpl<U, S, T, P>
where
    U: UserRepository,
    S: SessionRepository,
    T: TenantRepository,
    P: PaymentRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    tenant_repo: Arc<T>,
    payment_repo: Arc<P>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, S, T, P> AdminServiceImpl<U, S, T, P>
where
    U: UserRepository,
    S: SessionRepository,
    T: TenantRepository,
    P: PaymentRepository,
{
    /// Create a new AdminServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        tenant_repo: Arc<T>,
        payment_repo: Arc<P>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            tenant_repo,
            payment_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<U, S, T, P> AdminService for AdminServiceImpl<U, S, T, P>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    T: TenantRepository + 'static,
    P: PaymentRepository + 'static,
{
    async fn list_users(&self, query: UserQuery) -> Result<(Vec<User>, i64), AdminError> {
        let users = self
            .user_repo
            .list(&query)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        let total = self
            .user_repo
            .count(&query)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok((users, total))
    }

    async fn set_user_status(
        &self,
        user_id: i64,
        status: UserStatus,
    ) -> Result<(), AdminError> {
        self.user_repo
            .update_status(user_id, status)
            .await
            .map_err(|e| match e {
                crate::shared::error::AppError::NotFound(_) => AdminError::UserNotFound,
                other => AdminError::Internal(other.to_string()),
            })?;

        // A suspended account must not keep a live session.
        if status != UserStatus::Active {
            self.session_repo
                .revoke_all_for_user(user_id)
                .await
                .map_err(|e| AdminError::Internal(e.to_string()))?;
        }

        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), AdminError> {
        self.user_repo.delete(user_id).await.map_err(|e| match e {
            crate::shared::error::AppError::NotFound(_) => AdminError::UserNotFound,
            other => AdminError::Internal(other.to_string()),
        })
    }

    async fn list_payments(
        &self,
        status: PaymentStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, AdminError> {
        self.payment_repo
            .list_by_status(status, limit, offset)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))
    }

    async fn create_tenant(&self, input: CreateTenantDto) -> Result<Tenant, AdminError> {
        let now = Utc::now();
        let tenant = Tenant {
            id: self.id_generator.generate(),
            slug: slugify(&input.name),
            name: input.name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.tenant_repo.create(&tenant).await.map_err(|e| match e {
            crate::shared::error::AppError::Conflict(msg) => AdminError::Conflict(msg),
            other => AdminError::Internal(other.to_string()),
        })
    }

    async fn update_tenant(
        &self,
        tenant_id: i64,
        update: UpdateTenantDto,
    ) -> Result<Tenant, AdminError> {
        let mut tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))?
            .ok_or(AdminError::TenantNotFound)?;

        if let Some(name) = update.name {
            tenant.name = name;
        }
        if update.contact_email.is_some() {
            tenant.contact_email = update.contact_email;
        }
        if update.contact_phone.is_some() {
            tenant.contact_phone = update.contact_phone;
        }

        self.tenant_repo
            .update(&tenant)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))
    }

    async fn list_tenants(&self, active_only: bool) -> Result<Vec<Tenant>, AdminError> {
        self.tenant_repo
            .list(active_only)
            .await
            .map_err(|e| AdminError::Internal(e.to_string()))
    }

    async fn set_tenant_active(&self, tenant_id: i64, active: bool) -> Result<(), AdminError> {
        self.tenant_repo
            .set_active(tenant_id, active)
            .await
            .map_err(|e| match e {
                crate::shared::error::AppError::NotFound(_) => AdminError::TenantNotFound,
                other => AdminError::Internal(other.to_string()),
            })
    }
}
