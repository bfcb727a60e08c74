//! Category Repository Implementation
//!
//! PostgreSQL implementation of the CategoryRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Category, CategoryRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    position: i32,
    created_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            position: self.position,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL category repository implementation.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, position, created_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_category()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, position, created_at FROM categories \
             WHERE lower(name) = lower($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_category()))
    }

    async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, position, created_at FROM categories ORDER BY position, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_category()).collect())
    }

    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (id, name, slug, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, position, created_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Category '{}' already exists", category.name))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_category())
    }
}
