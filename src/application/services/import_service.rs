//! Bulk Import Service
//!
//! Normalizes spreadsheet rows into listings. Rows arrive already parsed
//! from the CSV/XLSX template; this service resolves categories and zones,
//! coerces prices, applies defaults, and collects per-row errors keyed by
//! 1-based row number.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    slugify, CategoryRepository, Currency, Listing, ListingCondition, ListingRepository,
    ListingStatus, Zone, ZoneRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// A raw row mirroring the import template's columns.
///
/// Field names match the template headers verbatim (`titulo, categoria,
/// zona, descripcion, precio, moneda, condicion, whatsapp, telefono,
/// email, instagram, foto_principal, foto_2..foto_5`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRow {
    pub titulo: Option<String>,
    pub categoria: Option<String>,
    pub zona: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<String>,
    pub moneda: Option<String>,
    pub condicion: Option<String>,
    pub whatsapp: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub foto_principal: Option<String>,
    pub foto_2: Option<String>,
    pub foto_3: Option<String>,
    pub foto_4: Option<String>,
    pub foto_5: Option<String>,
}

/// A validation error for one row, keyed by 1-based row number.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub field: &'static str,
    pub message: String,
}

/// Outcome of an import batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

/// Import service errors (row-level problems land in the report instead)
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Bulk import service trait
#[async_trait]
pub trait ImportService: Send + Sync {
    /// Normalize and insert a batch of rows for a user.
    ///
    /// `remaining_slots` is the publication allowance left on the user's
    /// plan (`None` = unlimited); rows beyond it are skipped with an
    /// error, counted incrementally across the batch.
    async fn import_rows(
        &self,
        user_id: i64,
        rows: Vec<ImportRow>,
        remaining_slots: Option<i64>,
    ) -> Result<ImportReport, ImportError>;
}

/// Coerce a spreadsheet price cell to a non-negative amount.
///
/// Strips currency tokens and whitespace, then accepts both digit-grouping
/// conventions: `1.234,56` and `1,234.56` (and ungrouped `1234.56`).
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    if dots > 0 && commas > 0 {
        // The rightmost separator is the decimal point, the other groups.
        let last_dot = cleaned.rfind('.').unwrap();
        let last_comma = cleaned.rfind(',').unwrap();
        if last_comma > last_dot {
            cleaned = cleaned.replace('.', "").replace(',', ".");
        } else {
            cleaned = cleaned.replace(',', "");
        }
    } else if commas > 0 {
        cleaned = normalize_single_separator(&cleaned, ',');
    } else if dots > 0 {
        cleaned = normalize_single_separator(&cleaned, '.');
    }

    let value: Decimal = cleaned.parse().ok()?;
    if value.is_sign_negative() {
        return None;
    }

    Some(value.round_dp(2))
}

/// Decide whether a lone separator is decimal or grouping: one occurrence
/// followed by one or two digits reads as a decimal point (`1500,5`),
/// anything else reads as grouping (`15.000`, `1.234.567`).
fn normalize_single_separator(s: &str, sep: char) -> String {
    let occurrences = s.matches(sep).count();
    let tail_len = s.rfind(sep).map(|i| s.len() - i - 1).unwrap_or(0);

    if occurrences == 1 && (1..=2).contains(&tail_len) {
        s.replace(sep, ".")
    } else {
        s.replace(sep, "")
    }
}

/// Normalize the `moneda` cell. Empty means pesos; unknown codes are a
/// row error.
pub fn parse_currency(raw: &str) -> Option<Currency> {
    match raw.trim().to_uppercase().as_str() {
        "" | "UYU" | "$" | "$U" | "UY$" | "PESOS" => Some(Currency::Uyu),
        "USD" | "U$S" | "US$" | "DOLARES" | "DÓLARES" => Some(Currency::Usd),
        _ => None,
    }
}

/// Normalize the `condicion` cell; anything unrecognized reads as used.
pub fn parse_condition(raw: &str) -> ListingCondition {
    match raw.trim().to_lowercase().as_str() {
        "nuevo" | "nueva" | "new" => ListingCondition::New,
        _ => ListingCondition::Used,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// ImportService implementation
pub struct ImportServiceImpl<C, Z, L>
where
    C: CategoryRepository,
    Z: ZoneRepository,
    L: ListingRepository,
{
    category_repo: Arc<C>,
    zone_repo: Arc<Z>,
    listing_repo: Arc<L>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<C, Z, L> ImportServiceImpl<C, Z, L>
where
    C: CategoryRepository,
    Z: ZoneRepository,
    L: ListingRepository,
{
    /// Create a new ImportServiceImpl
    pub fn new(
        category_repo: Arc<C>,
        zone_repo: Arc<Z>,
        listing_repo: Arc<L>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            category_repo,
            zone_repo,
            listing_repo,
            id_generator,
        }
    }

    /// Resolve the zone by name, creating the row when absent.
    async fn resolve_zone(&self, name: &str) -> Result<Zone, ImportError> {
        if let Some(zone) = self
            .zone_repo
            .find_by_name(name)
            .await
            .map_err(|e| ImportError::Internal(e.to_string()))?
        {
            return Ok(zone);
        }

        let zone = Zone {
            id: self.id_generator.generate(),
            name: name.trim().to_string(),
            slug: slugify(name),
            created_at: Utc::now(),
        };

        self.zone_repo
            .create(&zone)
            .await
            .map_err(|e| ImportError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<C, Z, L> ImportService for ImportServiceImpl<C, Z, L>
where
    C: CategoryRepository + 'static,
    Z: ZoneRepository + 'static,
    L: ListingRepository + 'static,
{
    async fn import_rows(
        &self,
        user_id: i64,
        rows: Vec<ImportRow>,
        remaining_slots: Option<i64>,
    ) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;

            // Category: must exist in the catalog.
            let Some(category_name) = non_blank(row.categoria) else {
                report.skipped += 1;
                report.errors.push(RowError {
                    row: row_number,
                    field: "categoria",
                    message: "missing category".into(),
                });
                continue;
            };

            let Some(category) = self
                .category_repo
                .find_by_name(&category_name)
                .await
                .map_err(|e| ImportError::Internal(e.to_string()))?
            else {
                report.skipped += 1;
                report.errors.push(RowError {
                    row: row_number,
                    field: "categoria",
                    message: format!("unknown category '{}'", category_name),
                });
                continue;
            };

            // Zone: created when absent.
            let Some(zone_name) = non_blank(row.zona) else {
                report.skipped += 1;
                report.errors.push(RowError {
                    row: row_number,
                    field: "zona",
                    message: "missing zone".into(),
                });
                continue;
            };
            let zone = self.resolve_zone(&zone_name).await?;

            // Price: required and coercible.
            let Some(price) = row.precio.as_deref().and_then(parse_price) else {
                report.skipped += 1;
                report.errors.push(RowError {
                    row: row_number,
                    field: "precio",
                    message: format!(
                        "unparseable price '{}'",
                        row.precio.as_deref().unwrap_or("")
                    ),
                });
                continue;
            };

            let Some(currency) = parse_currency(row.moneda.as_deref().unwrap_or("")) else {
                report.skipped += 1;
                report.errors.push(RowError {
                    row: row_number,
                    field: "moneda",
                    message: format!("unknown currency '{}'", row.moneda.as_deref().unwrap_or("")),
                });
                continue;
            };

            // The batch shares one allowance; count what we already inserted.
            if let Some(limit) = remaining_slots {
                if report.imported as i64 >= limit {
                    report.skipped += 1;
                    report.errors.push(RowError {
                        row: row_number,
                        field: "titulo",
                        message: "publication limit reached".into(),
                    });
                    continue;
                }
            }

            let title = non_blank(row.titulo).unwrap_or_else(|| category.name.clone());
            let description = non_blank(row.descripcion).unwrap_or_default();

            let photo_urls: Vec<String> = [
                row.foto_principal,
                row.foto_2,
                row.foto_3,
                row.foto_4,
                row.foto_5,
            ]
            .into_iter()
            .flat_map(non_blank)
            .collect();

            let now = Utc::now();
            let listing = Listing {
                id: self.id_generator.generate(),
                user_id,
                category_id: category.id,
                zone_id: zone.id,
                title,
                description,
                price,
                currency,
                condition: parse_condition(row.condicion.as_deref().unwrap_or("")),
                status: ListingStatus::Active,
                whatsapp: non_blank(row.whatsapp),
                phone: non_blank(row.telefono),
                email: non_blank(row.email),
                instagram: non_blank(row.instagram),
                photo_urls,
                created_at: now,
                updated_at: now,
            };

            // A failed insert skips the row and moves on.
            match self.listing_repo.create(&listing).await {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    tracing::warn!(row = row_number, error = %e, "import row failed to insert");
                    report.skipped += 1;
                    report.errors.push(RowError {
                        row: row_number,
                        field: "titulo",
                        message: format!("insert failed: {}", e),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Category, MockCategoryRepository, MockListingRepository, MockZoneRepository,
    };
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    // =========================================================================
    // Price coercion
    // =========================================================================

    #[test_case("1500", "1500" ; "plain integer")]
    #[test_case("1500.50", "1500.50" ; "dot decimal")]
    #[test_case("1.500,50", "1500.50" ; "eu grouping dot comma decimal")]
    #[test_case("1,500.50", "1500.50" ; "us grouping comma dot decimal")]
    #[test_case("15.000", "15000" ; "dot grouping thousands")]
    #[test_case("1.234.567", "1234567" ; "multiple dot groupings")]
    #[test_case("1500,5", "1500.5" ; "comma decimal one digit")]
    #[test_case("$ 1500", "1500" ; "dollar sign prefix")]
    #[test_case("U$S 2.500", "2500" ; "us prefix with grouping")]
    #[test_case("1,000", "1000" ; "comma grouping thousands")]
    fn test_parse_price_ok(input: &str, expected: &str) {
        let expected: Decimal = expected.parse().unwrap();
        assert_eq!(parse_price(input), Some(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("abc"; "letters")]
    #[test_case("consultar"; "word")]
    #[test_case("..,,"; "separators only")]
    fn test_parse_price_err(input: &str) {
        assert_eq!(parse_price(input), None);
    }

    #[test]
    fn test_parse_price_three_digit_tail_reads_as_grouping() {
        assert_eq!(parse_price("10.999"), Some(Decimal::new(10999, 0)));
        assert_eq!(parse_price("10.99"), Some(Decimal::new(1099, 2)));
    }

    // =========================================================================
    // Currency / condition normalization
    // =========================================================================

    #[test_case("", Some(Currency::Uyu) ; "empty defaults to uyu")]
    #[test_case("UYU", Some(Currency::Uyu) ; "uyu code")]
    #[test_case("$", Some(Currency::Uyu) ; "dollar sign is uyu")]
    #[test_case("pesos", Some(Currency::Uyu) ; "pesos is uyu")]
    #[test_case("USD", Some(Currency::Usd) ; "usd code")]
    #[test_case("u$s", Some(Currency::Usd) ; "u s symbol is usd")]
    #[test_case("EUR", None ; "eur unsupported")]
    fn test_parse_currency(input: &str, expected: Option<Currency>) {
        assert_eq!(parse_currency(input), expected);
    }

    #[test_case("nuevo", ListingCondition::New)]
    #[test_case("Nueva", ListingCondition::New)]
    #[test_case("usado", ListingCondition::Used)]
    #[test_case("", ListingCondition::Used)]
    #[test_case("como nuevo", ListingCondition::Used)]
    fn test_parse_condition(input: &str, expected: ListingCondition) {
        assert_eq!(parse_condition(input), expected);
    }

    // =========================================================================
    // Full batch flow (mocked repositories)
    // =========================================================================

    fn muebles() -> Category {
        Category {
            id: 7,
            name: "Muebles".into(),
            slug: "muebles".into(),
            position: 1,
            created_at: Utc::now(),
        }
    }

    fn pocitos() -> Zone {
        Zone {
            id: 9,
            name: "Pocitos".into(),
            slug: "pocitos".into(),
            created_at: Utc::now(),
        }
    }

    fn row(titulo: &str, categoria: &str, zona: &str, precio: &str) -> ImportRow {
        ImportRow {
            titulo: Some(titulo.into()),
            categoria: Some(categoria.into()),
            zona: Some(zona.into()),
            precio: Some(precio.into()),
            ..Default::default()
        }
    }

    fn service(
        category_repo: MockCategoryRepository,
        zone_repo: MockZoneRepository,
        listing_repo: MockListingRepository,
    ) -> ImportServiceImpl<MockCategoryRepository, MockZoneRepository, MockListingRepository> {
        ImportServiceImpl::new(
            Arc::new(category_repo),
            Arc::new(zone_repo),
            Arc::new(listing_repo),
            Arc::new(SnowflakeGenerator::new(1, 1)),
        )
    }

    #[tokio::test]
    async fn test_valid_rows_are_imported() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let mut zone_repo = MockZoneRepository::new();
        zone_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(pocitos())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_create()
            .times(2)
            .returning(|l| Ok(l.clone()));

        let svc = service(category_repo, zone_repo, listing_repo);

        let report = svc
            .import_rows(
                1,
                vec![
                    row("Mesa de roble", "Muebles", "Pocitos", "4.500"),
                    row("Silla", "muebles", "pocitos", "1.200,50"),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_row_without_zone_is_rejected() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let svc = service(
            category_repo,
            MockZoneRepository::new(),
            MockListingRepository::new(),
        );

        let mut bad_row = row("Mesa", "Muebles", "", "100");
        bad_row.zona = None;

        let report = svc.import_rows(1, vec![bad_row], None).await.unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors[0].row, 1);
        assert_eq!(report.errors[0].field, "zona");
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected_with_row_number() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|name| {
                if name == "Muebles" {
                    Ok(Some(muebles()))
                } else {
                    Ok(None)
                }
            });

        let mut zone_repo = MockZoneRepository::new();
        zone_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(pocitos())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo.expect_create().returning(|l| Ok(l.clone()));

        let svc = service(category_repo, zone_repo, listing_repo);

        let report = svc
            .import_rows(
                1,
                vec![
                    row("Mesa", "Muebles", "Pocitos", "100"),
                    row("Nave", "Naves Espaciales", "Pocitos", "100"),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors[0].row, 2);
        assert_eq!(report.errors[0].field, "categoria");
    }

    #[tokio::test]
    async fn test_missing_zone_is_created() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let mut zone_repo = MockZoneRepository::new();
        zone_repo.expect_find_by_name().returning(|_| Ok(None));
        zone_repo
            .expect_create()
            .times(1)
            .returning(|z| Ok(z.clone()));

        let mut listing_repo = MockListingRepository::new();
        listing_repo.expect_create().returning(|l| Ok(l.clone()));

        let svc = service(category_repo, zone_repo, listing_repo);

        let report = svc
            .import_rows(1, vec![row("Mesa", "Muebles", "Bella Vista", "100")], None)
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
    }

    #[tokio::test]
    async fn test_missing_title_defaults_to_category_name() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let mut zone_repo = MockZoneRepository::new();
        zone_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(pocitos())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_create()
            .withf(|l| l.title == "Muebles" && l.description.is_empty())
            .returning(|l| Ok(l.clone()));

        let svc = service(category_repo, zone_repo, listing_repo);

        let mut untitled = row("", "Muebles", "Pocitos", "100");
        untitled.titulo = None;
        untitled.descripcion = None;

        let report = svc.import_rows(1, vec![untitled], None).await.unwrap();
        assert_eq!(report.imported, 1);
    }

    #[tokio::test]
    async fn test_rows_beyond_allowance_are_skipped() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let mut zone_repo = MockZoneRepository::new();
        zone_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(pocitos())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_create()
            .times(1)
            .returning(|l| Ok(l.clone()));

        let svc = service(category_repo, zone_repo, listing_repo);

        let report = svc
            .import_rows(
                1,
                vec![
                    row("Mesa", "Muebles", "Pocitos", "100"),
                    row("Silla", "Muebles", "Pocitos", "200"),
                ],
                Some(1),
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors[0].message, "publication limit reached");
    }

    #[tokio::test]
    async fn test_failed_insert_continues_with_next_row() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(muebles())));

        let mut zone_repo = MockZoneRepository::new();
        zone_repo
            .expect_find_by_name()
            .returning(|_| Ok(Some(pocitos())));

        let mut listing_repo = MockListingRepository::new();
        let mut call = 0;
        listing_repo.expect_create().returning(move |l| {
            call += 1;
            if call == 1 {
                Err(crate::shared::error::AppError::Internal("boom".into()))
            } else {
                Ok(l.clone())
            }
        });

        let svc = service(category_repo, zone_repo, listing_repo);

        let report = svc
            .import_rows(
                1,
                vec![
                    row("Mesa", "Muebles", "Pocitos", "100"),
                    row("Silla", "Muebles", "Pocitos", "200"),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors[0].row, 1);
    }
}
