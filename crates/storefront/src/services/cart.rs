//! Cart operations.
//!
//! Thin layer over the store's cart actions that adds the checks the
//! storefront UI performs before dispatching: adding requires a logged-in
//! user and a product from the current catalog.

use tracing::{debug, instrument};

use scoder_core::ProductId;

use crate::error::{AppError, Result};
use crate::services::auth::AuthError;
use crate::store::{Action, Dispatch, Store};

/// Cart service.
pub struct CartService<'a> {
    store: &'a Store,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginRequired` for guests and `AppError::NotFound`
    /// if the product is not in the catalog snapshot. The cart is untouched
    /// in both cases.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add(&self, product_id: ProductId) -> Result<Dispatch> {
        let product = self.store.with_state(|state| {
            if !state.is_authenticated() {
                return Err(AppError::Auth(AuthError::LoginRequired));
            }
            state
                .product(product_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Product not found: {product_id}")))
        })?;

        debug!(title = %product.title, "Adding to cart");
        Ok(self.store.dispatch(Action::AddToCart(product)))
    }

    /// Add one more unit of a product already in the cart.
    pub fn increment(&self, product_id: ProductId) -> Dispatch {
        self.adjust(product_id, 1)
    }

    /// Remove one unit; the entry goes away when its quantity reaches zero.
    pub fn decrement(&self, product_id: ProductId) -> Dispatch {
        self.adjust(product_id, -1)
    }

    /// Set an entry's quantity; zero or less removes it.
    pub fn set_quantity(&self, product_id: ProductId, quantity: i64) -> Dispatch {
        self.store.dispatch(Action::UpdateCartQuantity {
            product_id,
            quantity,
        })
    }

    pub fn remove(&self, product_id: ProductId) -> Dispatch {
        self.store.dispatch(Action::RemoveFromCart(product_id))
    }

    pub fn clear(&self) -> Dispatch {
        self.store.dispatch(Action::ClearCart)
    }

    fn adjust(&self, product_id: ProductId, delta: i64) -> Dispatch {
        let current = self.store.with_state(|state| {
            state
                .cart
                .get(product_id)
                .map(|entry| i64::from(entry.quantity()))
        });

        match current {
            Some(quantity) => self.set_quantity(product_id, quantity.saturating_add(delta)),
            None => Dispatch::Unchanged,
        }
    }
}
