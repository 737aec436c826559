//! Product identifiers.
//!
//! Catalogs key products either by a numeric database ID or by a string
//! handle/SKU. [`ProductId`] accepts both and keeps the JSON shape the catalog
//! sent, so `1` stays a number and `"sku-1"` stays a string.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product identifier, unique across the catalog.
///
/// # Example
///
/// ```rust
/// use basket_core::ProductId;
///
/// let numeric = ProductId::from(42);
/// let handle = ProductId::from("pineapple-tee");
///
/// assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
/// assert_eq!(serde_json::to_string(&handle).unwrap(), "\"pineapple-tee\"");
///
/// // A number and a string with the same digits are different products.
/// assert_ne!(ProductId::from(7), ProductId::from("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric catalog ID.
    Int(i64),
    /// String handle or SKU.
    Str(String),
}

impl ProductId {
    /// Parse a command-line style argument.
    ///
    /// Anything that parses as an `i64` becomes [`ProductId::Int`]; everything
    /// else is kept as a string.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Str(s.to_owned()), Self::Int)
    }

    /// Returns the numeric ID, if this is one.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number_and_string() {
        let ids: Vec<ProductId> = serde_json::from_str(r#"[1, "sku-1"]"#).unwrap();
        assert_eq!(ids, vec![ProductId::Int(1), ProductId::from("sku-1")]);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(ProductId::parse_lenient("12"), ProductId::Int(12));
        assert_eq!(ProductId::parse_lenient("-3"), ProductId::Int(-3));
        assert_eq!(ProductId::parse_lenient("12a"), ProductId::from("12a"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::from(5).to_string(), "5");
        assert_eq!(ProductId::from("tee").to_string(), "tee");
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(ProductId::from(9).as_i64(), Some(9));
        assert_eq!(ProductId::from("9").as_i64(), None);
    }
}
