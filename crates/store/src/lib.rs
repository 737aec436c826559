//! Basket Store - Client-side shopping cart state container.
//!
//! Holds the cart lines for one shopping session, derives totals, and
//! mirrors the cart to a key-value slot so it survives reloads.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the lines and is the only writer of its slot
//! - [`Storage`] abstracts the slot (browser-style local storage contract)
//! - [`snapshot`] encodes and repairs persisted carts
//! - Observers subscribe for [`CartEvent`]s instead of polling
//!
//! Everything runs on the caller's thread. Operations never fail: storage
//! problems are logged with `tracing` and absorbed.
//!
//! # Example
//!
//! ```
//! use basket_core::{Price, Product, ProductId};
//! use basket_store::{CartConfig, CartStore, MemoryStorage};
//!
//! let mut cart = CartStore::open(CartConfig::default(), Some(MemoryStorage::new()));
//! cart.add_to_cart(Product::new(1, Price::from_cents(1000).unwrap()));
//! cart.decrease_quantity(&ProductId::from(1));
//! assert!(cart.is_empty());
//!
//! let storage = cart.close().unwrap();
//! # use basket_store::Storage;
//! assert_eq!(storage.get_item("my-cart").unwrap().as_deref(), Some("[]"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod events;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::{PersistError, SnapshotError, StorageError};
pub use events::{CartEvent, SubscriptionId};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::CartStore;
