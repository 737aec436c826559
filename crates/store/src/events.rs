//! Change notifications for cart observers.
//!
//! UI layers subscribe to a [`CartStore`](crate::CartStore) instead of
//! polling it. Listeners run synchronously, after the change has been
//! applied and persisted, in subscription order. Hydration is only applied.

use basket_core::{CartItem, ProductId};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart was loaded from its persistence slot.
    Hydrated {
        /// Number of lines restored.
        lines: usize,
    },
    /// A product was added as a new line.
    Added(ProductId),
    /// An existing line changed quantity.
    QuantityChanged {
        /// Line id.
        id: ProductId,
        /// New quantity.
        quantity: u32,
    },
    /// A line was removed.
    Removed(ProductId),
    /// All lines were removed.
    Cleared,
    /// Lines were replaced from an explicit snapshot.
    Restored {
        /// Number of lines restored.
        lines: usize,
    },
}

/// Handle returned by [`CartStore::subscribe`](crate::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartEvent, &[CartItem])>;

/// Ordered set of listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(
        &mut self,
        listener: impl FnMut(&CartEvent, &[CartItem]) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &CartEvent, items: &[CartItem]) {
        for (_, listener) in &mut self.entries {
            listener(event, items);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish_non_exhaustive()
    }
}
