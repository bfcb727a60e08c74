//! Database Module
//!
//! PostgreSQL connection pool, migrations, and transaction management.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::shared::error::AppError;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Execute a closure within a transaction.
///
/// Commits on success; the transaction rolls back automatically when
/// dropped on the error path.
pub async fn with_transaction<F, T>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: for<'c> FnOnce(
        &'c mut Transaction<'static, Postgres>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<T, sqlx::Error>> + Send + 'c>,
    >,
{
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    let result = f(&mut tx).await.map_err(AppError::Database)?;

    tx.commit().await.map_err(AppError::Database)?;

    Ok(result)
}
