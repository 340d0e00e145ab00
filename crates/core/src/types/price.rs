//! Price type.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input string is not a decimal number.
    #[error("price must be a number")]
    Invalid,
    /// The parsed value is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative monetary amount for a catalog product.
///
/// Prices are exact decimals, never floats. The canonical textual form
/// produced by [`Display`](fmt::Display) is what gets persisted, so a
/// price survives a store/load cycle without drifting.
///
/// ## Examples
///
/// ```
/// use stocklist_core::Price;
///
/// assert!(Price::parse("19.99").is_ok());
/// assert!(Price::parse("0").is_ok());
///
/// assert!(Price::parse("abc").is_err());  // not a number
/// assert!(Price::parse("-5").is_err());   // negative
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a `Price` from a string.
    ///
    /// Surrounding whitespace is trimmed before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a decimal number,
    /// or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let value: Decimal = trimmed.parse().map_err(|_| PriceError::Invalid)?;

        if value.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        Ok(Self(value))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert!(Price::parse("19.99").is_ok());
        assert!(Price::parse("0").is_ok());
        assert!(Price::parse("0.00").is_ok());
        assert!(Price::parse("1000000").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let price = Price::parse("  19.99  ").unwrap();
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Price::parse(""), Err(PriceError::Empty)));
        assert!(matches!(Price::parse("   "), Err(PriceError::Empty)));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid)));
        assert!(matches!(Price::parse("12,50"), Err(PriceError::Invalid)));
        assert!(matches!(Price::parse("$5"), Err(PriceError::Invalid)));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(Price::parse("-5"), Err(PriceError::Negative)));
        assert!(matches!(Price::parse("-0.01"), Err(PriceError::Negative)));
    }

    #[test]
    fn test_display_preserves_scale() {
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse("5").unwrap().to_string(), "5");
        assert_eq!(Price::parse("0.50").unwrap().to_string(), "0.50");
    }

    #[test]
    fn test_display_roundtrip() {
        let price = Price::parse("123.45").unwrap();
        let reparsed = Price::parse(&price.to_string()).unwrap();
        assert_eq!(reparsed, price);
    }

    #[test]
    fn test_ordering() {
        let cheap = Price::parse("1.00").unwrap();
        let dear = Price::parse("2.00").unwrap();
        assert!(cheap < dear);
    }
}
