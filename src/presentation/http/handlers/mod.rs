//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod health;
pub mod import;
pub mod listing;
pub mod property;
pub mod restaurant;
pub mod subscription;

use crate::domain::Currency;
use crate::shared::error::AppError;

/// Parse a snowflake ID from its wire string form.
pub(crate) fn parse_id(value: &str) -> Result<i64, AppError> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", value)))
}

/// Parse an optional currency field; pesos when omitted.
pub(crate) fn parse_currency_field(value: Option<&str>) -> Result<Currency, AppError> {
    match value.map(|v| v.trim().to_uppercase()) {
        None => Ok(Currency::Uyu),
        Some(v) if v.is_empty() || v == "UYU" => Ok(Currency::Uyu),
        Some(v) if v == "USD" => Ok(Currency::Usd),
        Some(v) => Err(AppError::BadRequest(format!("unknown currency '{}'", v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("not-a-number").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn test_parse_currency_field() {
        assert_eq!(parse_currency_field(None).unwrap(), Currency::Uyu);
        assert_eq!(parse_currency_field(Some("usd")).unwrap(), Currency::Usd);
        assert_eq!(parse_currency_field(Some("UYU")).unwrap(), Currency::Uyu);
        assert!(parse_currency_field(Some("EUR")).is_err());
    }
}
