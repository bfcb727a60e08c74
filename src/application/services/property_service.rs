//! Property Service
//!
//! Tenant-scoped CRUD for real-estate publications plus lead intake.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    Currency, Lead, LeadRepository, LeadStatus, OperationType, Property, PropertyFilter,
    PropertyRepository, PropertyStatus, PropertyType, TenantRepository, User, UserRole,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Property service trait
#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Create a property under the acting user's tenant
    /// (the publish handler performs the limit check).
    async fn create(&self, user: &User, input: CreatePropertyDto)
        -> Result<Property, PropertyError>;

    /// Fetch a property; soft-deleted rows read as missing.
    async fn get(&self, property_id: i64) -> Result<Property, PropertyError>;

    /// Search active properties.
    async fn search(
        &self,
        filter: PropertyFilter,
    ) -> Result<(Vec<Property>, i64), PropertyError>;

    /// Update a property; tenant members and admins only.
    async fn update(
        &self,
        property_id: i64,
        user: &User,
        update: UpdatePropertyDto,
    ) -> Result<Property, PropertyError>;

    /// Change the status (pause, reactivate, mark sold, soft delete).
    async fn set_status(
        &self,
        property_id: i64,
        user: &User,
        status: PropertyStatus,
    ) -> Result<(), PropertyError>;

    /// Record a visitor inquiry against a property (public).
    async fn create_lead(
        &self,
        property_id: i64,
        input: CreateLeadDto,
    ) -> Result<Lead, PropertyError>;

    /// List the acting user's tenant leads.
    async fn list_leads(
        &self,
        user: &User,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, PropertyError>;

    /// Update a lead's handling status; tenant members and admins only.
    async fn set_lead_status(
        &self,
        lead_id: i64,
        user: &User,
        status: LeadStatus,
    ) -> Result<(), PropertyError>;
}

/// Create property input
#[derive(Debug, Clone)]
pub struct CreatePropertyDto {
    pub zone_id: i64,
    pub title: String,
    pub description: String,
    pub operation: OperationType,
    pub property_type: PropertyType,
    pub price: Decimal,
    pub currency: Currency,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub address: Option<String>,
    pub photo_urls: Vec<String>,
}

/// Update property input; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePropertyDto {
    pub zone_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub operation: Option<OperationType>,
    pub property_type: Option<PropertyType>,
    pub price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub address: Option<String>,
    pub photo_urls: Option<Vec<String>>,
}

/// Create lead input
#[derive(Debug, Clone)]
pub struct CreateLeadDto {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

/// Property service errors
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("Property not found")]
    NotFound,

    #[error("Lead not found")]
    LeadNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("User does not belong to an agency")]
    NoTenant,

    #[error("Agency is inactive")]
    TenantInactive,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// PropertyService implementation
pub struct PropertyServiceImpl<P, T, Ld>
where
    P: PropertyRepository,
    T: TenantRepository,
    Ld: LeadRepository,
{
    property_repo: Arc<P>,
    tenant_repo: Arc<T>,
    lead_repo: Arc<Ld>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<P, T, Ld> PropertyServiceImpl<P, T, Ld>
where
    P: PropertyRepository,
    T: TenantRepository,
    Ld: LeadRepository,
{
    /// Create a new PropertyServiceImpl
    pub fn new(
        property_repo: Arc<P>,
        tenant_repo: Arc<T>,
        lead_repo: Arc<Ld>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            property_repo,
            tenant_repo,
            lead_repo,
            id_generator,
        }
    }

    fn may_manage(user: &User, tenant_id: i64) -> bool {
        user.role == UserRole::Admin || user.tenant_id == Some(tenant_id)
    }

    async fn load_managed(
        &self,
        property_id: i64,
        user: &User,
    ) -> Result<Property, PropertyError> {
        let property = self
            .property_repo
            .find_by_id(property_id)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?
            .filter(|p| p.status != PropertyStatus::Deleted)
            .ok_or(PropertyError::NotFound)?;

        if !Self::may_manage(user, property.tenant_id) {
            return Err(PropertyError::Forbidden);
        }

        Ok(property)
    }
}

#[async_trait]
impl<P, T, Ld> PropertyService for PropertyServiceImpl<P, T, Ld>
where
    P: PropertyRepository + 'static,
    T: TenantRepository + 'static,
    Ld: LeadRepository + 'static,
{
    async fn create(
        &self,
        user: &User,
        input: CreatePropertyDto,
    ) -> Result<Property, PropertyError> {
        let tenant_id = user.tenant_id.ok_or(PropertyError::NoTenant)?;

        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?
            .ok_or(PropertyError::NoTenant)?;

        if !tenant.active {
            return Err(PropertyError::TenantInactive);
        }

        let now = Utc::now();
        let property = Property {
            id: self.id_generator.generate(),
            tenant_id,
            created_by: user.id,
            zone_id: input.zone_id,
            title: input.title,
            description: input.description,
            operation: input.operation,
            property_type: input.property_type,
            price: input.price,
            currency: input.currency,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            area_m2: input.area_m2,
            address: input.address,
            photo_urls: input.photo_urls,
            status: PropertyStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.property_repo
            .create(&property)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }

    async fn get(&self, property_id: i64) -> Result<Property, PropertyError> {
        self.property_repo
            .find_by_id(property_id)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?
            .filter(|p| p.status != PropertyStatus::Deleted)
            .ok_or(PropertyError::NotFound)
    }

    async fn search(
        &self,
        filter: PropertyFilter,
    ) -> Result<(Vec<Property>, i64), PropertyError> {
        let items = self
            .property_repo
            .search(&filter)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?;

        let total = self
            .property_repo
            .count_search(&filter)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?;

        Ok((items, total))
    }

    async fn update(
        &self,
        property_id: i64,
        user: &User,
        update: UpdatePropertyDto,
    ) -> Result<Property, PropertyError> {
        let mut property = self.load_managed(property_id, user).await?;

        if let Some(zone_id) = update.zone_id {
            property.zone_id = zone_id;
        }
        if let Some(title) = update.title {
            property.title = title;
        }
        if let Some(description) = update.description {
            property.description = description;
        }
        if let Some(operation) = update.operation {
            property.operation = operation;
        }
        if let Some(property_type) = update.property_type {
            property.property_type = property_type;
        }
        if let Some(price) = update.price {
            property.price = price;
        }
        if let Some(currency) = update.currency {
            property.currency = currency;
        }
        if update.bedrooms.is_some() {
            property.bedrooms = update.bedrooms;
        }
        if update.bathrooms.is_some() {
            property.bathrooms = update.bathrooms;
        }
        if update.area_m2.is_some() {
            property.area_m2 = update.area_m2;
        }
        if update.address.is_some() {
            property.address = update.address;
        }
        if let Some(photo_urls) = update.photo_urls {
            property.photo_urls = photo_urls;
        }

        self.property_repo
            .update(&property)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }

    async fn set_status(
        &self,
        property_id: i64,
        user: &User,
        status: PropertyStatus,
    ) -> Result<(), PropertyError> {
        self.load_managed(property_id, user).await?;

        self.property_repo
            .set_status(property_id, status)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }

    async fn create_lead(
        &self,
        property_id: i64,
        input: CreateLeadDto,
    ) -> Result<Lead, PropertyError> {
        let property = self.get(property_id).await?;

        let lead = Lead {
            id: self.id_generator.generate(),
            tenant_id: property.tenant_id,
            property_id: property.id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            message: input.message,
            status: LeadStatus::New,
            created_at: Utc::now(),
        };

        self.lead_repo
            .create(&lead)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }

    async fn list_leads(
        &self,
        user: &User,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, PropertyError> {
        let tenant_id = user.tenant_id.ok_or(PropertyError::NoTenant)?;

        self.lead_repo
            .list_for_tenant(tenant_id, status, limit, offset)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }

    async fn set_lead_status(
        &self,
        lead_id: i64,
        user: &User,
        status: LeadStatus,
    ) -> Result<(), PropertyError> {
        let lead = self
            .lead_repo
            .find_by_id(lead_id)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))?
            .ok_or(PropertyError::LeadNotFound)?;

        if !Self::may_manage(user, lead.tenant_id) {
            return Err(PropertyError::Forbidden);
        }

        self.lead_repo
            .set_status(lead_id, status)
            .await
            .map_err(|e| PropertyError::Internal(e.to_string()))
    }
}
