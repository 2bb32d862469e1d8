//! # Cart State
//!
//! The session's cart, plus the change channel views listen on.
//!
//! ## Thread Safety
//! The cart is wrapped in a `Mutex` so each ledger mutation (including its
//! re-pricing) is atomic over the line collection.
//!
//! ## Change Notification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Session Action           Command                 Cart State Change     │
//! │  ──────────────           ───────                 ─────────────────     │
//! │                                                                         │
//! │  add 10 2 ───────────────► add_to_cart() ───────► lines.push / merge   │
//! │  set 10 5 ───────────────► update_cart_item() ──► lines[i].qty = 5     │
//! │  remove 10 ──────────────► remove_from_cart() ──► lines.remove(i)      │
//! │  reload ─────────────────► reload_catalog() ────► recalculate prices   │
//! │                                                                         │
//! │  every with_cart_mut() ──► watch::Sender::send_if_modified(snapshot)   │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                     subscribers see the new CartSnapshot                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use strato_core::{Cart, CartLine, CartTotals};
use tokio::sync::watch;

/// Immutable view of the cart: its lines and their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        }
    }
}

/// Thread-safe cart wrapper.
#[derive(Debug)]
pub struct CartState {
    cart: Mutex<Cart>,
    changes: watch::Sender<CartSnapshot>,
}

impl CartState {
    pub fn new() -> Self {
        let cart = Cart::new();
        let (changes, _) = watch::channel(CartSnapshot::from(&cart));
        CartState {
            cart: Mutex::new(cart),
            changes,
        }
    }

    /// Subscribes to cart snapshots. The receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(|cart| CartSnapshot::from(cart))
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart, then publishes the
    /// resulting snapshot if it differs from the last one.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(store, service, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut cart);

        let snapshot = CartSnapshot::from(&*cart);
        self.changes.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });

        result
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_core::{CatalogStore, Category, Service};

    fn catalog() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_categories(vec![Category {
            id: 1,
            name: "Cloud".to_string(),
            services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
        }]);
        store
    }

    #[test]
    fn test_mutation_publishes_snapshot() {
        let store = catalog();
        let state = CartState::new();
        let mut rx = state.subscribe();
        assert!(rx.borrow_and_update().lines.is_empty());

        let backup = store.service_by_id(10).unwrap();
        state
            .with_cart_mut(|cart| cart.add_item(&store, backup, 2))
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.totals.items_count, 2);
        assert_eq!(snapshot.totals.total_original_price.cents(), 10_000);
    }

    #[test]
    fn test_noop_mutation_does_not_notify() {
        let store = catalog();
        let state = CartState::new();
        let mut rx = state.subscribe();
        rx.borrow_and_update();

        state
            .with_cart_mut(|cart| cart.update_quantity(&store, 404, 3))
            .unwrap();

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_snapshot_matches_cart() {
        let store = catalog();
        let state = CartState::new();
        let backup = store.service_by_id(10).unwrap();
        state
            .with_cart_mut(|cart| cart.add_item(&store, backup, 1))
            .unwrap();

        let snapshot = state.snapshot();
        assert_eq!(snapshot, state.with_cart(|cart| CartSnapshot::from(cart)));
        assert_eq!(*state.subscribe().borrow(), snapshot);
    }
}
