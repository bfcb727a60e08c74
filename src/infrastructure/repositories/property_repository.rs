//! Property Repository Implementation
//!
//! PostgreSQL implementation of the PropertyRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    Currency, OperationType, Property, PropertyFilter, PropertyRepository, PropertyStatus,
    PropertyType,
};
use crate::shared::error::AppError;

/// Database row representation matching the properties table schema.
#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    id: i64,
    tenant_id: i64,
    created_by: i64,
    zone_id: i64,
    title: String,
    description: String,
    operation: String,
    property_type: String,
    price: Decimal,
    currency: String,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    area_m2: Option<Decimal>,
    address: Option<String>,
    photo_urls: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    fn into_property(self) -> Property {
        Property {
            id: self.id,
            tenant_id: self.tenant_id,
            created_by: self.created_by,
            zone_id: self.zone_id,
            title: self.title,
            description: self.description,
            operation: OperationType::from_str(&self.operation),
            property_type: PropertyType::from_str(&self.property_type),
            price: self.price,
            currency: Currency::from_str(&self.currency),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_m2: self.area_m2,
            address: self.address,
            photo_urls: self.photo_urls,
            status: PropertyStatus::from_str(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const PROPERTY_COLUMNS: &str =
    "id, tenant_id, created_by, zone_id, title, description, operation, property_type, \
     price, currency, bedrooms, bathrooms, area_m2, address, photo_urls, status, \
     created_at, updated_at";

/// Shared WHERE clause for public search; binds $1..$7.
const SEARCH_WHERE: &str = "status = 'active'
      AND ($1::text IS NULL OR operation = $1)
      AND ($2::text IS NULL OR property_type = $2)
      AND ($3::bigint IS NULL OR zone_id = $3)
      AND ($4::bigint IS NULL OR tenant_id = $4)
      AND ($5::numeric IS NULL OR price >= $5)
      AND ($6::numeric IS NULL OR price <= $6)
      AND ($7::int IS NULL OR bedrooms >= $7)";

/// PostgreSQL property repository implementation.
#[derive(Clone)]
pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    /// Create a new PgPropertyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Property>, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_property()))
    }

    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            INSERT INTO properties (id, tenant_id, created_by, zone_id, title, description,
                                    operation, property_type, price, currency, bedrooms,
                                    bathrooms, area_m2, address, photo_urls, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(property.id)
        .bind(property.tenant_id)
        .bind(property.created_by)
        .bind(property.zone_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.operation.as_str())
        .bind(property.property_type.as_str())
        .bind(property.price)
        .bind(property.currency.as_str())
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_m2)
        .bind(&property.address)
        .bind(&property.photo_urls)
        .bind(property.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_property())
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            UPDATE properties
            SET zone_id = $2,
                title = $3,
                description = $4,
                operation = $5,
                property_type = $6,
                price = $7,
                currency = $8,
                bedrooms = $9,
                bathrooms = $10,
                area_m2 = $11,
                address = $12,
                photo_urls = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(property.id)
        .bind(property.zone_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.operation.as_str())
        .bind(property.property_type.as_str())
        .bind(property.price)
        .bind(property.currency.as_str())
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_m2)
        .bind(&property.address)
        .bind(&property.photo_urls)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Property with id {} not found", property.id))
        })?;

        Ok(row.into_property())
    }

    async fn set_status(&self, id: i64, status: PropertyStatus) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE properties SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Property with id {} not found", id)));
        }

        Ok(())
    }

    async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            SELECT {PROPERTY_COLUMNS} FROM properties
            WHERE {SEARCH_WHERE}
            ORDER BY created_at DESC
            LIMIT $8 OFFSET $9
            "#
        ))
        .bind(filter.operation.map(|o| o.as_str()))
        .bind(filter.property_type.map(|t| t.as_str()))
        .bind(filter.zone_id)
        .bind(filter.tenant_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.min_bedrooms)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_property()).collect())
    }

    async fn count_search(&self, filter: &PropertyFilter) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM properties WHERE {SEARCH_WHERE}"
        ))
        .bind(filter.operation.map(|o| o.as_str()))
        .bind(filter.property_type.map(|t| t.as_str()))
        .bind(filter.zone_id)
        .bind(filter.tenant_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.min_bedrooms)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_active_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM properties WHERE created_by = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
