//! The cart state container.
//!
//! [`CartStore`] owns the ordered list of cart lines, derives totals from it,
//! and mirrors it to a [`Storage`] slot after every change. It is an explicit
//! context object: create one per shopping session with [`CartStore::open`],
//! hand it to whatever needs cart access, and [`CartStore::close`] it at the
//! end of the session.
//!
//! # Invariants
//!
//! After every operation:
//! - no two lines share an id
//! - every line has a quantity of at least 1
//! - lines keep the order in which their product was first added
//!
//! # Failure model
//!
//! Operations never return errors. Missing ids are silent no-ops. Storage and
//! snapshot failures are logged. A malformed slot loads as an empty cart, an
//! unreadable slot leaves the current lines alone, and a failed save keeps
//! the change in memory only.

use std::panic::{self, AssertUnwindSafe};

use basket_core::{CartItem, Product, ProductId};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::config::CartConfig;
use crate::error::{PersistError, SnapshotError};
use crate::events::{CartEvent, Listeners, SubscriptionId};
use crate::snapshot;
use crate::storage::Storage;

/// A shopping cart mirrored to a key-value slot.
///
/// # Example
///
/// ```
/// use basket_core::{Price, Product};
/// use basket_store::{CartConfig, CartStore, MemoryStorage};
///
/// let mut cart = CartStore::open(CartConfig::default(), Some(MemoryStorage::new()));
/// let tee = Product::new(1, Price::from_cents(1000).unwrap());
///
/// cart.add_to_cart(tee.clone());
/// cart.add_to_cart(tee);
/// cart.add_to_cart(Product::new(2, Price::from_cents(500).unwrap()));
///
/// assert_eq!(cart.len(), 2);
/// assert_eq!(cart.item_count(), 3);
/// assert_eq!(cart.total_price().to_string(), "25.00");
/// ```
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    config: CartConfig,
    storage: Option<S>,
    items: Vec<CartItem>,
    listeners: Listeners,
    batching: bool,
    pending: Vec<CartEvent>,
}

impl<S: Storage> CartStore<S> {
    /// Create a store and hydrate it from `config.storage_key`.
    ///
    /// Pass `None` for `storage` when no client storage exists (for example
    /// during server-side rendering). The cart then lives in memory only and
    /// persistence is skipped without error.
    #[instrument(skip_all, fields(key = %config.storage_key, persisted = storage.is_some()))]
    pub fn open(config: CartConfig, storage: Option<S>) -> Self {
        let mut store = Self {
            config,
            storage,
            items: Vec::new(),
            listeners: Listeners::default(),
            batching: false,
            pending: Vec::new(),
        };
        store.items = store.load().unwrap_or_default();
        tracing::debug!(lines = store.items.len(), "Cart hydrated");
        store
    }

    /// End the session: write a final snapshot and hand the storage back.
    #[must_use]
    pub fn close(mut self) -> Option<S> {
        self.save();
        self.storage
    }

    /// Re-read the persistence slot, replacing the in-memory lines.
    ///
    /// A missing or malformed slot yields an empty cart. If the slot cannot
    /// be read at all, the current lines are kept. Hydration never writes.
    pub fn rehydrate(&mut self) {
        let Some(items) = self.load() else {
            return;
        };
        self.items = items;
        let event = CartEvent::Hydrated {
            lines: self.items.len(),
        };
        if self.batching {
            self.pending.push(event);
        } else {
            self.listeners.notify(&event, &self.items);
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gains one unit; otherwise a new line
    /// with quantity 1 is appended. Any quantity on `product` is ignored.
    #[instrument(skip_all, fields(id = %product.id))]
    pub fn add_to_cart(&mut self, product: Product) {
        if self.position(&product.id).is_some() {
            self.increase_quantity(&product.id);
            return;
        }

        let item = CartItem::from_product(product);
        let id = item.id.clone();
        self.items.push(item);
        tracing::debug!("Line added");
        self.commit(CartEvent::Added(id));
    }

    /// Remove the line for `id`, if any.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        self.items.remove(pos);
        tracing::debug!("Line removed");
        self.commit(CartEvent::Removed(id.clone()));
    }

    /// Remove every line.
    ///
    /// Always persists, so the slot holds an empty array afterwards.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.items.clear();
        tracing::debug!("Cart cleared");
        self.commit(CartEvent::Cleared);
    }

    /// Add one unit to the line for `id`, if any.
    #[instrument(skip(self))]
    pub fn increase_quantity(&mut self, id: &ProductId) {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return;
        };
        let Some(quantity) = item.quantity.checked_add(1) else {
            tracing::warn!(quantity = item.quantity, "Line quantity at maximum, not increased");
            return;
        };
        item.quantity = quantity;
        tracing::debug!(quantity, "Line quantity increased");
        self.commit(CartEvent::QuantityChanged {
            id: id.clone(),
            quantity,
        });
    }

    /// Take one unit off the line for `id`, removing the line at zero.
    #[instrument(skip(self))]
    pub fn decrease_quantity(&mut self, id: &ProductId) {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return;
        };
        if item.quantity <= 1 {
            self.remove_from_cart(id);
            return;
        }
        item.quantity -= 1;
        let quantity = item.quantity;
        tracing::debug!(quantity, "Line quantity decreased");
        self.commit(CartEvent::QuantityChanged {
            id: id.clone(),
            quantity,
        });
    }

    /// Replace all lines with those in `raw`, a snapshot from
    /// [`CartStore::snapshot`].
    ///
    /// The snapshot is repaired the same way hydration repairs it. Returns
    /// `false` and leaves the cart unchanged if it cannot be decoded.
    #[instrument(skip_all)]
    pub fn restore(&mut self, raw: &str) -> bool {
        match snapshot::decode(raw) {
            Ok(items) => {
                self.items = items;
                let lines = self.items.len();
                self.commit(CartEvent::Restored { lines });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable cart snapshot");
                false
            }
        }
    }

    /// Run several mutations and persist once at the end.
    ///
    /// Listeners are notified after the final write, in mutation order, and
    /// see the lines as they are at the end of the batch. Nested batches
    /// fold into the outermost one.
    ///
    /// If `f` panics, the changes it made so far are written, listeners are
    /// skipped and the panic is resumed.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.batching {
            return f(self);
        }

        self.batching = true;
        let out = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.batching = false;

        let events = std::mem::take(&mut self.pending);
        if !events.is_empty() {
            self.save();
        }
        match out {
            Ok(out) => {
                for event in &events {
                    self.listeners.notify(event, &self.items);
                }
                out
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The cart encoded the way it is persisted.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if a display field cannot be serialized.
    pub fn snapshot(&self) -> Result<String, SnapshotError> {
        snapshot::encode(&self.items)
    }

    /// Store configuration.
    #[must_use]
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The storage backend, if any.
    #[must_use]
    pub const fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Register a listener called after every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CartEvent, &[CartItem]) + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Persist and notify, or queue while batching.
    fn commit(&mut self, event: CartEvent) {
        if self.batching {
            self.pending.push(event);
            return;
        }
        self.save();
        self.listeners.notify(&event, &self.items);
    }

    /// Lines held in the slot, or `None` if the slot could not be read.
    fn load(&self) -> Option<Vec<CartItem>> {
        let Some(storage) = &self.storage else {
            return Some(Vec::new());
        };
        let key = &self.config.storage_key;

        let raw = match storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(Vec::new()),
            Err(e) => {
                tracing::warn!(%key, error = %e, "Failed to read cart from storage");
                return None;
            }
        };

        Some(snapshot::decode(&raw).unwrap_or_else(|e| {
            tracing::warn!(%key, error = %e, "Discarding unreadable persisted cart");
            Vec::new()
        }))
    }

    fn save(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let key = &self.config.storage_key;

        let result = snapshot::encode(&self.items)
            .map_err(PersistError::from)
            .and_then(|raw| storage.set_item(key, &raw).map_err(PersistError::from));

        if let Err(e) = result {
            tracing::warn!(%key, error = %e, "Failed to persist cart");
        }
    }
}
