//! Catalog products and cart line items.
//!
//! The catalog owns the product shape; the cart only relies on `id` and
//! `price`. Every other field (`name`, `image`, ...) is carried through
//! untouched in a flattened [`Fields`] map.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Opaque display fields passed through from the catalog.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Field names the cart owns. They never live in [`Fields`].
const RESERVED_FIELDS: &[&str] = &["id", "price", "quantity"];

fn strip_reserved(fields: &mut Fields) {
    for key in RESERVED_FIELDS {
        fields.remove(*key);
    }
}

/// A product as handed over by the catalog.
///
/// ```
/// use basket_core::{Price, Product};
///
/// let product: Product = serde_json::from_str(
///     r#"{"id": 1, "price": 10, "name": "Pineapple Tee", "image": "/tee.png"}"#,
/// ).unwrap();
///
/// assert_eq!(product.price, Price::from_cents(1000).unwrap());
/// assert_eq!(product.fields["name"], "Pineapple Tee");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Unit price.
    pub price: Price,
    /// Quantity carried by some callers. The cart ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Other display fields.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Product {
    /// Create a product with no display fields.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, price: Price) -> Self {
        Self {
            id: id.into(),
            price,
            quantity: None,
            fields: Fields::new(),
        }
    }

    /// Attach a display field. Reserved names (`id`, `price`, `quantity`)
    /// are ignored.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if !RESERVED_FIELDS.contains(&key) {
            self.fields.insert(key.to_owned(), value.into());
        }
        self
    }
}

/// A line in the cart: a product snapshot plus a quantity.
///
/// Persisted as `{"id": .., "price": .., "quantity": .., ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog identifier. Unique within a cart.
    pub id: ProductId,
    /// Unit price captured when the line was created.
    pub price: Price,
    /// Number of units. Always at least 1 inside a cart.
    pub quantity: u32,
    /// Display fields copied from the product.
    #[serde(flatten)]
    pub fields: Fields,
}

impl CartItem {
    /// Start a new line for `product` with a quantity of 1.
    ///
    /// Any quantity on the product is discarded.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        let Product {
            id,
            price,
            mut fields,
            ..
        } = product;
        strip_reserved(&mut fields);
        Self {
            id,
            price,
            quantity: 1,
            fields,
        }
    }

    /// `price * quantity`, saturating.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    /// Returns a display field as a string, if present and a string.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_product_sets_quantity_one() {
        let mut product = Product::new(1, Price::from_cents(1000).unwrap());
        product.quantity = Some(7);
        let item = CartItem::from_product(product);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_fields_pass_through() {
        let product: Product = serde_json::from_value(json!({
            "id": "tee",
            "price": 12.5,
            "name": "Tee",
            "tags": ["summer"]
        }))
        .unwrap();
        let item = CartItem::from_product(product);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"id": "tee", "price": 12.5, "quantity": 1, "name": "Tee", "tags": ["summer"]})
        );
        assert_eq!(item.field_str("name"), Some("Tee"));
    }

    #[test]
    fn test_input_quantity_not_copied_into_fields() {
        let product: Product =
            serde_json::from_value(json!({"id": 2, "price": 5, "quantity": 4})).unwrap();
        assert_eq!(product.quantity, Some(4));
        let item = CartItem::from_product(product);
        assert!(item.fields.is_empty());
    }

    #[test]
    fn test_with_field_ignores_reserved() {
        let product = Product::new(3, Price::ZERO)
            .with_field("quantity", 9)
            .with_field("name", "Cap");
        assert_eq!(product.fields.len(), 1);
    }

    #[test]
    fn test_line_total() {
        let mut item = CartItem::from_product(Product::new(1, Price::from_cents(250).unwrap()));
        item.quantity = 4;
        assert_eq!(item.line_total(), Decimal::new(10, 0));
    }
}
