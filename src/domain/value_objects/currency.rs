//! Currency value object.
//!
//! The marketplace trades in Uruguayan pesos and US dollars only; every
//! priced row carries one of these codes in a VARCHAR(3) CHECK column.

use serde::{Deserialize, Serialize};

/// ISO-ish currency code stored alongside every price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Uruguayan peso
    #[default]
    Uyu,
    /// US dollar
    Usd,
}

impl Currency {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "USD" => Self::Usd,
            _ => Self::Uyu,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uyu => "UYU",
            Self::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for currency in [Currency::Uyu, Currency::Usd] {
            assert_eq!(Currency::from_str(currency.as_str()), currency);
        }
    }

    #[test]
    fn test_unknown_defaults_to_uyu() {
        assert_eq!(Currency::from_str("EUR"), Currency::Uyu);
        assert_eq!(Currency::from_str(""), Currency::Uyu);
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }
}
