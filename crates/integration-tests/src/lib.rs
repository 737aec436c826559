//! Integration tests for Basket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p basket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Worked examples of the cart operations
//! - `cart_invariants` - Seeded random operation sequences
//! - `cart_persistence` - Hydration and snapshots across sessions
//!
//! This library holds the fixtures shared by those tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use basket_core::{Price, Product};
use basket_store::{CartConfig, CartStore, MemoryStorage};

/// A product with a numeric id and a price in cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: i64, cents: i64) -> Product {
    Product::new(id, Price::from_cents(cents).unwrap())
}

/// A fresh store over empty in-memory storage.
#[must_use]
pub fn memory_cart() -> CartStore<MemoryStorage> {
    CartStore::open(CartConfig::default(), Some(MemoryStorage::new()))
}

/// A unique, not-yet-created directory under the system temp dir.
#[must_use]
pub fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}
