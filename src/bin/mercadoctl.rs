//! # mercadoctl
//!
//! Maintenance CLI for one-off data operations: migrations, catalog
//! seeding, price conversions, image path repairs, and user cleanup.
//!
//! Commands run sequentially against the database, log per row, continue
//! past row failures, and exit non-zero when any row failed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info, warn};

use mercado_server::config::Settings;
use mercado_server::domain::{SessionRepository, SubscriptionRepository};
use mercado_server::infrastructure::database;
use mercado_server::infrastructure::repositories::{
    PgSessionRepository, PgSubscriptionRepository,
};
use mercado_server::shared::snowflake::SnowflakeGenerator;

#[derive(Parser)]
#[command(name = "mercadoctl", about = "Mercado Server maintenance tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations
    Migrate,

    /// Seed baseline zones, categories, and the plan catalog
    Seed,

    /// Convert prices between currencies at a fixed rate
    ConvertPrices {
        /// Source currency code (UYU or USD)
        #[arg(long, value_enum)]
        from: Currency,

        /// Target currency code (UYU or USD)
        #[arg(long, value_enum)]
        to: Currency,

        /// Conversion rate applied to each price
        #[arg(long)]
        rate: Decimal,

        /// Table to convert
        #[arg(long, value_enum, default_value = "listings")]
        table: PriceTable,
    },

    /// Rewrite photo URL prefixes (e.g. after a CDN move)
    RepairImagePaths {
        /// Prefix to replace
        #[arg(long)]
        from_prefix: String,

        /// Replacement prefix
        #[arg(long)]
        to_prefix: String,
    },

    /// Remove stale accounts with no publications
    CleanupUsers {
        /// Minimum account age in days
        #[arg(long, default_value_t = 180)]
        inactive_days: i64,

        /// Report what would be deleted without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Mark overdue active subscriptions expired
    ExpireSubscriptions,

    /// Delete expired and revoked sessions
    CleanupSessions,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Currency {
    Uyu,
    Usd,
}

impl Currency {
    fn as_str(self) -> &'static str {
        match self {
            Self::Uyu => "UYU",
            Self::Usd => "USD",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceTable {
    Listings,
    Properties,
    MenuItems,
}

impl PriceTable {
    fn table_name(self) -> &'static str {
        match self {
            Self::Listings => "listings",
            Self::Properties => "properties",
            Self::MenuItems => "menu_items",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    mercado_server::telemetry::init_tracing();

    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load settings")?;
    let pool = database::create_pool(&settings.database)
        .await
        .context("failed to connect to the database")?;

    let failures = match cli.command {
        Command::Migrate => {
            database::run_migrations(&pool)
                .await
                .context("migrations failed")?;
            info!("Migrations applied");
            0
        }
        Command::Seed => seed(&pool).await?,
        Command::ConvertPrices {
            from,
            to,
            rate,
            table,
        } => convert_prices(&pool, from, to, rate, table).await?,
        Command::RepairImagePaths {
            from_prefix,
            to_prefix,
        } => repair_image_paths(&pool, &from_prefix, &to_prefix).await?,
        Command::CleanupUsers {
            inactive_days,
            dry_run,
        } => cleanup_users(&pool, inactive_days, dry_run).await?,
        Command::ExpireSubscriptions => {
            let repo = PgSubscriptionRepository::new(pool.clone());
            let expired = repo
                .expire_overdue()
                .await
                .context("failed to expire subscriptions")?;
            info!(expired, "overdue subscriptions expired");
            0
        }
        Command::CleanupSessions => {
            let repo = PgSessionRepository::new(pool.clone());
            let deleted = repo
                .delete_expired()
                .await
                .context("failed to delete sessions")?;
            info!(deleted, "expired sessions deleted");
            0
        }
    };

    if failures > 0 {
        error!(failures, "finished with failures");
        std::process::exit(1);
    }

    Ok(())
}

/// Seed baseline zones, categories, and plans. Idempotent.
async fn seed(pool: &PgPool) -> Result<u64> {
    let ids = SnowflakeGenerator::new(31, 31);
    let mut failures = 0u64;

    const ZONES: &[&str] = &[
        "Centro", "Cordón", "Pocitos", "Punta Carretas", "Malvín", "Buceo", "Carrasco",
        "Prado", "La Blanqueada", "Ciudad Vieja",
    ];

    const CATEGORIES: &[&str] = &[
        "Muebles", "Electrodomésticos", "Tecnología", "Vehículos", "Ropa y Calzado",
        "Hogar y Jardín", "Deportes", "Servicios", "Mascotas", "Otros",
    ];

    // (code, name, price, max_listings, max_properties, max_menu_items)
    const PLANS: &[(&str, &str, &str, i32, i32, i32)] = &[
        ("free", "Gratis", "0", 5, 1, 10),
        ("pro", "Pro", "490", 25, 10, 50),
        ("premium", "Premium", "990", -1, -1, -1),
    ];

    for &name in ZONES {
        let result = sqlx::query(
            "INSERT INTO zones (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING",
        )
        .bind(ids.generate())
        .bind(name)
        .bind(mercado_server::domain::slugify(name))
        .execute(pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() > 0 => info!(zone = name, "zone seeded"),
            Ok(_) => {}
            Err(e) => {
                warn!(zone = name, error = %e, "zone seed failed");
                failures += 1;
            }
        }
    }

    for (position, &name) in CATEGORIES.iter().enumerate() {
        let result = sqlx::query(
            "INSERT INTO categories (id, name, slug, position) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(ids.generate())
        .bind(name)
        .bind(mercado_server::domain::slugify(name))
        .bind(position as i32)
        .execute(pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() > 0 => info!(category = name, "category seeded"),
            Ok(_) => {}
            Err(e) => {
                warn!(category = name, error = %e, "category seed failed");
                failures += 1;
            }
        }
    }

    for &(code, name, price, max_listings, max_properties, max_menu_items) in PLANS {
        let price: Decimal = price.parse().expect("static plan price");
        let result = sqlx::query(
            "INSERT INTO plans (id, code, name, price, currency, max_listings, \
             max_properties, max_menu_items) VALUES ($1, $2, $3, $4, 'UYU', $5, $6, $7) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(ids.generate())
        .bind(code)
        .bind(name)
        .bind(price)
        .bind(max_listings)
        .bind(max_properties)
        .bind(max_menu_items)
        .execute(pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() > 0 => info!(plan = code, "plan seeded"),
            Ok(_) => {}
            Err(e) => {
                warn!(plan = code, error = %e, "plan seed failed");
                failures += 1;
            }
        }
    }

    info!("Seeding finished");
    Ok(failures)
}

/// Convert prices row by row so a single bad row does not abort the run.
async fn convert_prices(
    pool: &PgPool,
    from: Currency,
    to: Currency,
    rate: Decimal,
    table: PriceTable,
) -> Result<u64> {
    anyhow::ensure!(from != to, "source and target currency are the same");
    anyhow::ensure!(rate > Decimal::ZERO, "rate must be positive");

    let table = table.table_name();

    let rows: Vec<(i64, Decimal)> =
        sqlx::query_as(&format!("SELECT id, price FROM {table} WHERE currency = $1"))
            .bind(from.as_str())
            .fetch_all(pool)
            .await?;

    info!(table, rows = rows.len(), "starting price conversion");

    let mut converted = 0u64;
    let mut failures = 0u64;

    for (id, price) in rows {
        let new_price = (price * rate).round_dp(2);

        let result = sqlx::query(&format!(
            "UPDATE {table} SET price = $2, currency = $3, updated_at = NOW() WHERE id = $1"
        ))
        .bind(id)
        .bind(new_price)
        .bind(to.as_str())
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                info!(id, %price, %new_price, "converted");
                converted += 1;
            }
            Err(e) => {
                warn!(id, error = %e, "conversion failed, continuing");
                failures += 1;
            }
        }
    }

    info!(converted, failures, "price conversion finished");
    Ok(failures)
}

/// Rewrite photo URL prefixes across listings, properties, and
/// restaurants.
async fn repair_image_paths(pool: &PgPool, from_prefix: &str, to_prefix: &str) -> Result<u64> {
    anyhow::ensure!(!from_prefix.is_empty(), "from_prefix must not be empty");

    let mut repaired = 0u64;
    let mut failures = 0u64;

    for table in ["listings", "properties"] {
        let rows: Vec<(i64, Vec<String>)> = sqlx::query_as(&format!(
            "SELECT id, photo_urls FROM {table} \
             WHERE EXISTS (SELECT 1 FROM unnest(photo_urls) u WHERE u LIKE $1 || '%')"
        ))
        .bind(from_prefix)
        .fetch_all(pool)
        .await?;

        info!(table, rows = rows.len(), "repairing photo urls");

        for (id, photo_urls) in rows {
            let fixed: Vec<String> = photo_urls
                .iter()
                .map(|url| match url.strip_prefix(from_prefix) {
                    Some(rest) => format!("{to_prefix}{rest}"),
                    None => url.clone(),
                })
                .collect();

            let result = sqlx::query(&format!(
                "UPDATE {table} SET photo_urls = $2, updated_at = NOW() WHERE id = $1"
            ))
            .bind(id)
            .bind(&fixed)
            .execute(pool)
            .await;

            match result {
                Ok(_) => repaired += 1,
                Err(e) => {
                    warn!(table, id, error = %e, "repair failed, continuing");
                    failures += 1;
                }
            }
        }
    }

    // Restaurants carry a single photo column.
    let result = sqlx::query(
        "UPDATE restaurants SET photo_url = $2 || substr(photo_url, length($1) + 1), \
         updated_at = NOW() WHERE photo_url LIKE $1 || '%'",
    )
    .bind(from_prefix)
    .bind(to_prefix)
    .execute(pool)
    .await;

    match result {
        Ok(r) => repaired += r.rows_affected(),
        Err(e) => {
            warn!(error = %e, "restaurant photo repair failed");
            failures += 1;
        }
    }

    info!(repaired, failures, "image path repair finished");
    Ok(failures)
}

/// Remove old plain accounts that never published anything.
async fn cleanup_users(pool: &PgPool, inactive_days: i64, dry_run: bool) -> Result<u64> {
    let candidates: Vec<(i64, String)> = sqlx::query_as(
        r#"
        SELECT u.id, u.email
        FROM users u
        WHERE u.role = 'user'
          AND (u.status = 'deleted' OR u.created_at < NOW() - ($1 || ' days')::interval)
          AND NOT EXISTS (SELECT 1 FROM listings l WHERE l.user_id = u.id)
          AND NOT EXISTS (SELECT 1 FROM properties p WHERE p.created_by = u.id)
          AND NOT EXISTS (SELECT 1 FROM restaurants r WHERE r.owner_id = u.id)
        "#,
    )
    .bind(inactive_days.to_string())
    .fetch_all(pool)
    .await?;

    info!(candidates = candidates.len(), dry_run, "user cleanup starting");

    if dry_run {
        for (id, email) in &candidates {
            info!(id, email = %email, "would delete");
        }
        return Ok(0);
    }

    let mut deleted = 0u64;
    let mut failures = 0u64;

    for (id, email) in candidates {
        match sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
        {
            Ok(_) => {
                info!(id, email = %email, "deleted");
                deleted += 1;
            }
            Err(e) => {
                warn!(id, error = %e, "delete failed, continuing");
                failures += 1;
            }
        }
    }

    info!(deleted, failures, "user cleanup finished");
    Ok(failures)
}
