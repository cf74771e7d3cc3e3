//! Application state and its transition function.
//!
//! [`reduce`] is the only way state changes: it takes the current state and
//! one [`Action`] and returns the next state. It never fails and never
//! performs I/O; actions that reference products not in the cart leave the
//! state as it was.

use scoder_core::ProductId;

use crate::catalog::Product;
use crate::models::User;

use super::cart::Cart;
use super::search::filter_products;

/// The root state value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Logged-in user, `None` for guests.
    pub user: Option<User>,
    /// The shopping cart.
    pub cart: Cart,
    /// Catalog snapshot from the last successful fetch.
    pub products: Vec<Product>,
    /// Whether a catalog fetch is in flight.
    pub loading: bool,
    /// Free-text search query.
    pub search_query: String,
    /// Message from the last failed catalog fetch, cleared on success.
    pub catalog_error: Option<String>,
}

impl AppState {
    /// Catalog products matching the current search query.
    pub fn filtered_products(&self) -> impl Iterator<Item = &Product> {
        filter_products(&self.products, &self.search_query)
    }

    /// Look up a product in the catalog snapshot.
    #[must_use]
    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the logged-in user (`None` logs out).
    SetUser(Option<User>),
    /// Replace the catalog snapshot wholesale.
    SetProducts(Vec<Product>),
    /// Set the catalog loading flag.
    SetLoading(bool),
    /// Replace the search query.
    SetSearchQuery(String),
    /// Add one unit of a product to the cart.
    AddToCart(Product),
    /// Remove a product's entry from the cart.
    RemoveFromCart(ProductId),
    /// Set a product's cart quantity; zero or less removes the entry.
    UpdateCartQuantity {
        product_id: ProductId,
        quantity: i64,
    },
    /// Empty the cart.
    ClearCart,
    /// Record or clear the last catalog fetch failure.
    SetCatalogError(Option<String>),
}

impl Action {
    /// Stable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "set_user",
            Self::SetProducts(_) => "set_products",
            Self::SetLoading(_) => "set_loading",
            Self::SetSearchQuery(_) => "set_search_query",
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::UpdateCartQuantity { .. } => "update_cart_quantity",
            Self::ClearCart => "clear_cart",
            Self::SetCatalogError(_) => "set_catalog_error",
        }
    }
}

/// Apply one action to `state`, producing the next state.
#[must_use]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetUser(user) => state.user = user,
        Action::SetProducts(products) => state.products = products,
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetSearchQuery(query) => state.search_query = query,
        Action::AddToCart(product) => state.cart.add(product),
        Action::RemoveFromCart(product_id) => {
            state.cart.remove(product_id);
        }
        Action::UpdateCartQuantity {
            product_id,
            quantity,
        } => {
            state.cart.set_quantity(product_id, quantity);
        }
        Action::ClearCart => state.cart.clear(),
        Action::SetCatalogError(message) => state.catalog_error = message,
    }
    state
}
