//! Zone entity and repository trait.
//!
//! Maps to the `zones` table. A zone is a neighborhood/region used to
//! filter listings, properties, and restaurants. Unlike categories, zones
//! are an open set: the bulk importer creates missing zones on the fly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A neighborhood/region row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Display name (unique)
    pub name: String,

    /// URL slug (unique)
    pub slug: String,

    pub created_at: DateTime<Utc>,
}

/// Build a URL slug from a zone or category name.
///
/// Lowercases, maps the Spanish accented vowels and ñ to ASCII, and
/// collapses every other non-alphanumeric run into a single dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.to_lowercase().chars() {
        let mapped = match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            c if c.is_ascii_alphanumeric() => c,
            _ => {
                if !last_dash {
                    slug.push('-');
                    last_dash = true;
                }
                continue;
            }
        };
        slug.push(mapped);
        last_dash = false;
    }

    slug.trim_end_matches('-').to_string()
}

/// Repository trait for Zone data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Find a zone by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>, AppError>;

    /// Find a zone by name, case-insensitively.
    async fn find_by_name(&self, name: &str) -> Result<Option<Zone>, AppError>;

    /// List all zones ordered by name.
    async fn list_all(&self) -> Result<Vec<Zone>, AppError>;

    /// Create a new zone.
    async fn create(&self, zone: &Zone) -> Result<Zone, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Pocitos", "pocitos")]
    #[test_case("Barrio Sur", "barrio-sur")]
    #[test_case("Peñarol", "penarol")]
    #[test_case("Cordón / Centro", "cordon-centro")]
    #[test_case("  La Unión  ", "la-union")]
    #[test_case("José Ignacio", "jose-ignacio")]
    fn test_slugify(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_slugify_never_ends_with_dash() {
        assert!(!slugify("Malvín!!!").ends_with('-'));
    }
}
