//! JSON snapshot codec for persisted carts.
//!
//! The slot holds a JSON array of cart lines:
//!
//! ```json
//! [{"id": 1, "price": 10, "quantity": 2, "name": "Tee"}]
//! ```
//!
//! Older builds persisted the whole store state instead, `{"items": [...]}`.
//! Both shapes decode.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use basket_core::{CartItem, ProductId};
use serde::Deserialize;

use crate::error::SnapshotError;

/// Shapes a persisted cart may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Lines(Vec<CartItem>),
    State { items: Vec<CartItem> },
}

/// Encode cart lines as a JSON array.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if a display field cannot be serialized.
pub fn encode(items: &[CartItem]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a persisted cart and repair it.
///
/// See [`normalize`] for the repairs applied.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if `raw` is not one of the accepted shapes.
pub fn decode(raw: &str) -> Result<Vec<CartItem>, SnapshotError> {
    let items = match serde_json::from_str(raw)? {
        Persisted::Lines(items) | Persisted::State { items } => items,
    };
    let decoded = items.len();
    let items = normalize(items);
    if items.len() != decoded {
        tracing::warn!(
            decoded,
            kept = items.len(),
            "Repaired persisted cart (zero quantities or duplicate ids)"
        );
    }
    Ok(items)
}

/// Restore cart invariants on lines from an untrusted source.
///
/// Lines with a quantity of zero are dropped. Lines repeating an earlier id
/// are folded into the first occurrence, summing quantities (saturating).
/// Order of first appearance is kept.
#[must_use]
pub fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut out: Vec<CartItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        if item.quantity == 0 {
            continue;
        }
        match index.entry(item.id.clone()) {
            Entry::Occupied(slot) => {
                if let Some(first) = out.get_mut(*slot.get()) {
                    first.quantity = first.quantity.saturating_add(item.quantity);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(out.len());
                out.push(item);
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use basket_core::Price;
    use serde_json::json;

    use super::*;

    fn line(id: i64, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::from(id),
            price: Price::from_cents(cents).unwrap(),
            quantity,
            fields: basket_core::Fields::new(),
        }
    }

    #[test]
    fn test_encode_shape() {
        let encoded = encode(&[line(1, 1000, 2), line(2, 500, 1)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!([
                {"id": 1, "price": 10, "quantity": 2},
                {"id": 2, "price": 5, "quantity": 1}
            ])
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_decode_array() {
        let items = decode(r#"[{"id": 1, "price": 10, "quantity": 2, "name": "Tee"}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].field_str("name"), Some("Tee"));
    }

    #[test]
    fn test_decode_legacy_state_object() {
        let items = decode(r#"{"items": [{"id": "cap", "price": "4.50", "quantity": 1}]}"#).unwrap();
        assert_eq!(items[0].id, ProductId::from("cap"));
        assert_eq!(items[0].price, Price::from_cents(450).unwrap());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("not json").is_err());
        assert!(decode("").is_err());
        assert!(decode("null").is_err());
        assert!(decode(r#"[{"id": 1}]"#).is_err());
        assert!(decode(r#"[{"id": 1, "price": -2, "quantity": 1}]"#).is_err());
    }

    #[test]
    fn test_normalize_drops_zero_and_merges_duplicates() {
        let items = normalize(vec![
            line(1, 100, 1),
            line(2, 100, 0),
            line(3, 100, 2),
            line(1, 100, 4),
        ]);
        let summary: Vec<(i64, u32)> = items
            .iter()
            .map(|i| (i.id.as_i64().unwrap(), i.quantity))
            .collect();
        assert_eq!(summary, vec![(1, 5), (3, 2)]);
    }

    #[test]
    fn test_normalize_saturates() {
        let items = normalize(vec![line(1, 100, u32::MAX), line(1, 100, 3)]);
        assert_eq!(items[0].quantity, u32::MAX);
    }
}
