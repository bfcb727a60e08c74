//! Zone Repository Implementation
//!
//! PostgreSQL implementation of the ZoneRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Zone, ZoneRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ZoneRow {
    id: i64,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
}

impl ZoneRow {
    fn into_zone(self) -> Zone {
        Zone {
            id: self.id,
            name: self.name,
            slug: self.slug,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL zone repository implementation.
#[derive(Clone)]
pub struct PgZoneRepository {
    pool: PgPool,
}

impl PgZoneRepository {
    /// Create a new PgZoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ZoneRepository for PgZoneRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>, AppError> {
        let row = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, slug, created_at FROM zones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_zone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Zone>, AppError> {
        let row = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, slug, created_at FROM zones WHERE lower(name) = lower($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_zone()))
    }

    async fn list_all(&self) -> Result<Vec<Zone>, AppError> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, slug, created_at FROM zones ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_zone()).collect())
    }

    async fn create(&self, zone: &Zone) -> Result<Zone, AppError> {
        let row = sqlx::query_as::<_, ZoneRow>(
            r#"
            INSERT INTO zones (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(zone.id)
        .bind(&zone.name)
        .bind(&zone.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Zone '{}' already exists", zone.name))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_zone())
    }
}
