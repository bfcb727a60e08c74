//! Listing Repository Implementation
//!
//! PostgreSQL implementation of the ListingRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    Currency, Listing, ListingCondition, ListingFilter, ListingRepository, ListingStatus,
};
use crate::shared::error::AppError;

/// Database row representation matching the listings table schema.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: i64,
    user_id: i64,
    category_id: i64,
    zone_id: i64,
    title: String,
    description: String,
    price: Decimal,
    currency: String,
    condition: String,
    status: String,
    whatsapp: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    instagram: Option<String>,
    photo_urls: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self) -> Listing {
        Listing {
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            zone_id: self.zone_id,
            title: self.title,
            description: self.description,
            price: self.price,
            currency: Currency::from_str(&self.currency),
            condition: ListingCondition::from_str(&self.condition),
            status: ListingStatus::from_str(&self.status),
            whatsapp: self.whatsapp,
            phone: self.phone,
            email: self.email,
            instagram: self.instagram,
            photo_urls: self.photo_urls,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const LISTING_COLUMNS: &str =
    "id, user_id, category_id, zone_id, title, description, price, currency, condition, \
     status, whatsapp, phone, email, instagram, photo_urls, created_at, updated_at";

/// Shared WHERE clause for public search; binds $1..$5.
const SEARCH_WHERE: &str = "status = 'active'
      AND ($1::bigint IS NULL OR zone_id = $1)
      AND ($2::bigint IS NULL OR category_id = $2)
      AND ($3::text IS NULL
           OR title ILIKE '%' || $3 || '%'
           OR description ILIKE '%' || $3 || '%')
      AND ($4::numeric IS NULL OR price >= $4)
      AND ($5::numeric IS NULL OR price <= $5)";

/// PostgreSQL listing repository implementation.
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    /// Create a new PgListingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_listing()))
    }

    async fn create(&self, listing: &Listing) -> Result<Listing, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            INSERT INTO listings (id, user_id, category_id, zone_id, title, description,
                                  price, currency, condition, status, whatsapp, phone,
                                  email, instagram, photo_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing.id)
        .bind(listing.user_id)
        .bind(listing.category_id)
        .bind(listing.zone_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.as_str())
        .bind(listing.condition.as_str())
        .bind(listing.status.as_str())
        .bind(&listing.whatsapp)
        .bind(&listing.phone)
        .bind(&listing.email)
        .bind(&listing.instagram)
        .bind(&listing.photo_urls)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_listing())
    }

    async fn update(&self, listing: &Listing) -> Result<Listing, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE listings
            SET category_id = $2,
                zone_id = $3,
                title = $4,
                description = $5,
                price = $6,
                currency = $7,
                condition = $8,
                whatsapp = $9,
                phone = $10,
                email = $11,
                instagram = $12,
                photo_urls = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing.id)
        .bind(listing.category_id)
        .bind(listing.zone_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.as_str())
        .bind(listing.condition.as_str())
        .bind(&listing.whatsapp)
        .bind(&listing.phone)
        .bind(&listing.email)
        .bind(&listing.instagram)
        .bind(&listing.photo_urls)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing with id {} not found", listing.id)))?;

        Ok(row.into_listing())
    }

    async fn set_status(&self, id: i64, status: ListingStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE listings SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Listing with id {} not found", id)));
        }

        Ok(())
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE {SEARCH_WHERE}
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(filter.zone_id)
        .bind(filter.category_id)
        .bind(&filter.text)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_listing()).collect())
    }

    async fn count_search(&self, filter: &ListingFilter) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM listings WHERE {SEARCH_WHERE}"
        ))
        .bind(filter.zone_id)
        .bind(filter.category_id)
        .bind(&filter.text)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_active_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM listings WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
