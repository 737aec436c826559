//! Type-safe unit price representation using decimal arithmetic.
//!
//! Prices are plain non-negative amounts. The cart never converts between
//! currencies or applies tax, so no currency code travels with the amount.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative unit price.
///
/// Serialized as a JSON number so persisted carts stay readable by any JSON
/// consumer. Deserialization also accepts numeric strings (`"19.99"`).
///
/// ## Examples
///
/// ```
/// use basket_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::from_cents(1999).unwrap();
/// assert_eq!(price.amount(), Decimal::new(1999, 2));
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates instead of overflowing.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts are written as integers so `10` stays `10`, not `10.0`.
        if self.0.fract().is_zero() {
            if let Ok(whole) = i64::try_from(self.0) {
                return serializer.serialize_i64(whole);
            }
        }
        let text = self.0.normalize().to_string();
        match exact_number(&text, self.0) {
            Some(number) => number.serialize(serializer),
            // Amounts a JSON double cannot hold are written as numeric strings.
            None => serializer.serialize_str(&text),
        }
    }
}

/// The JSON number for `text`, if reading it back yields `amount` again.
fn exact_number(text: &str, amount: Decimal) -> Option<serde_json::Number> {
    let number = serde_json::Number::from_str(text).ok()?;
    let written = number.to_string();
    let read_back = Decimal::from_str(&written)
        .or_else(|_| Decimal::from_scientific(&written))
        .ok()?;
    (read_back == amount).then_some(number)
}

/// Wire forms accepted for a price.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(s) => s,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_serialize_whole_as_integer() {
        let price = Price::new(Decimal::new(10, 0)).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "10");
    }

    #[test]
    fn test_serialize_fraction_as_number() {
        let price = Price::from_cents(1999).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.99");
    }

    #[test]
    fn test_high_precision_survives_json() {
        let price: Price = "1.234567890123456789".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1.234567890123456789\"");
        assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
    }

    #[test]
    fn test_max_amount_survives_json() {
        let price = Price::new(Decimal::MAX).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Price = serde_json::from_str("5").unwrap();
        let b: Price = serde_json::from_str("0.1").unwrap();
        let c: Price = serde_json::from_str("\"2.50\"").unwrap();
        assert_eq!(a.amount(), Decimal::new(5, 0));
        assert_eq!(b.amount(), Decimal::new(1, 1));
        assert_eq!(c.amount(), Decimal::new(25, 1));
    }

    #[test]
    fn test_deserialize_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>("\"free\"").is_err());
        assert!(serde_json::from_str::<Price>("null").is_err());
    }

    #[test]
    fn test_times_saturates() {
        let price = Price::new(Decimal::MAX).unwrap();
        assert_eq!(price.times(2), Decimal::MAX);
        assert_eq!(Price::from_cents(250).unwrap().times(3), Decimal::new(75, 1));
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::new(Decimal::new(25, 0)).unwrap().to_string(), "25.00");
    }
}
