//! The application store.
//!
//! # Architecture
//!
//! - [`AppState`] is a plain value; [`reduce`] turns a state and an
//!   [`Action`] into the next state
//! - [`Store`] owns the current state inside a `tokio::sync::watch` channel,
//!   so every dispatch publishes one complete replacement state and any
//!   number of observers can follow along via [`Store::subscribe`]
//! - Side effects (persisting the user) hang off [`StateObserver`]s that
//!   see the previous and next state of every change
//!
//! The store has a single writer. It is `Sync` so it can be shared with
//! tasks that only read or subscribe.
//!
//! # Example
//!
//! ```rust
//! use scoder_storefront::store::{Action, Dispatch, Store};
//!
//! let store = Store::default();
//! assert_eq!(store.dispatch(Action::SetSearchQuery("bag".into())), Dispatch::Changed);
//! assert_eq!(store.dispatch(Action::SetSearchQuery("bag".into())), Dispatch::Unchanged);
//! assert_eq!(store.state().search_query, "bag");
//! ```

mod cart;
mod search;
mod state;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::catalog::Product;

pub use cart::{Cart, CartEntry};
pub use search::filter_products;
pub use state::{Action, AppState, reduce};

/// Outcome of a dispatch.
///
/// Actions are never rejected; this only tells the caller whether the state
/// actually changed. Cart edits for products that are not in the cart come
/// back as `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Changed,
    Unchanged,
}

impl Dispatch {
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Receives every state change after it has been published.
pub trait StateObserver: Send + Sync {
    /// Called once per dispatch that changed the state.
    fn on_transition(&self, previous: &AppState, next: &AppState);
}

/// Owner of the application state.
pub struct Store {
    state: watch::Sender<AppState>,
    observers: Vec<Arc<dyn StateObserver>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.borrow())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Store {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers run in registration order.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn StateObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Apply `action` to the current state and publish the result.
    pub fn dispatch(&self, action: Action) -> Dispatch {
        if self.replace(action).is_some() {
            Dispatch::Changed
        } else {
            Dispatch::Unchanged
        }
    }

    /// Apply `action` and return the state it replaced, or `None` if the
    /// state did not change.
    ///
    /// Reading the old state and publishing the new one happen under the
    /// same write lock, so nothing dispatched concurrently can slip in
    /// between.
    pub fn replace(&self, action: Action) -> Option<AppState> {
        let name = action.name();
        let mut transition = None;

        self.state.send_if_modified(|current| {
            let next = reduce(current.clone(), action);
            if next == *current {
                return false;
            }
            let previous = std::mem::replace(current, next);
            transition = Some((previous, current.clone()));
            true
        });

        let Some((previous, next)) = transition else {
            debug!(action = name, "dispatch left state unchanged");
            return None;
        };

        debug!(
            action = name,
            cart_items = next.cart.item_count(),
            products = next.products.len(),
            "state updated"
        );
        for observer in &self.observers {
            observer.on_transition(&previous, &next);
        }
        Some(previous)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Run `f` against the current state without cloning it.
    ///
    /// `f` must not dispatch.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Follow state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Catalog products matching the current search query.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Product> {
        self.with_state(|state| state.filtered_products().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;
    use scoder_core::ProductId;

    use super::*;
    use crate::catalog::Rating;

    fn product(id: i64, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(cents, 2),
            description: String::new(),
            category: "misc".to_string(),
            image: None,
            rating: Rating::default(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u64, u64)>>,
    }

    impl StateObserver for Recorder {
        fn on_transition(&self, previous: &AppState, next: &AppState) {
            self.seen
                .lock()
                .unwrap()
                .push((previous.cart.item_count(), next.cart.item_count()));
        }
    }

    #[test]
    fn test_dispatch_reports_changes() {
        let store = Store::default();
        let shirt = product(1, "Shirt", 1500);

        assert_eq!(store.dispatch(Action::AddToCart(shirt)), Dispatch::Changed);
        assert_eq!(
            store.dispatch(Action::RemoveFromCart(ProductId::new(2))),
            Dispatch::Unchanged
        );
        assert_eq!(store.dispatch(Action::SetLoading(false)), Dispatch::Unchanged);
        assert_eq!(store.state().cart.total(), Decimal::new(1500, 2));
    }

    #[test]
    fn test_observers_see_previous_and_next() {
        let recorder = Arc::new(Recorder::default());
        let store = Store::default().with_observer(recorder.clone());

        store.dispatch(Action::AddToCart(product(1, "Shirt", 1500)));
        store.dispatch(Action::AddToCart(product(1, "Shirt", 1500)));
        store.dispatch(Action::RemoveFromCart(ProductId::new(9)));
        store.dispatch(Action::ClearCart);

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_subscribers_receive_replacement_state() {
        let store = Store::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Action::SetSearchQuery("ring".to_string()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search_query, "ring");

        store.dispatch(Action::SetSearchQuery("ring".to_string()));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_replace_returns_previous_state() {
        let store = Store::default();
        store.dispatch(Action::AddToCart(product(1, "Shirt", 1500)));

        let previous = store.replace(Action::ClearCart).unwrap();
        assert_eq!(previous.cart.item_count(), 1);
        assert!(store.state().cart.is_empty());

        assert!(store.replace(Action::ClearCart).is_none());
    }

    #[test]
    fn test_filtered_products() {
        let store = Store::default();
        store.dispatch(Action::SetProducts(vec![
            product(1, "Gold Ring", 100),
            product(2, "Backpack", 100),
        ]));
        assert_eq!(store.filtered_products().len(), 2);

        store.dispatch(Action::SetSearchQuery("RING".to_string()));
        let filtered = store.filtered_products();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().map(|p| p.id), Some(ProductId::new(1)));
    }
}
