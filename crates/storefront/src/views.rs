//! Display data derived from the application state.
//!
//! Views are plain owned values with prices already formatted, so a
//! front end can render them without touching decimals or the store.

use scoder_core::{Price, ProductId};

use crate::catalog::Product;
use crate::store::{AppState, Cart, CartEntry};

/// Image shown for products without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Units across all lines (the header badge).
    pub item_count: u64,
    /// One-line description under the cart heading.
    pub summary: String,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::default())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Product card display data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub rating: f64,
    pub review_count: u32,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

/// What the product list should show.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed and there is nothing to show.
    Unavailable(String),
    /// The catalog is loaded but nothing matches the search.
    NoMatches { query: String },
    Products(Vec<ProductCardView>),
}

impl CatalogView {
    /// Build the product list for the current search query.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        if state.loading {
            return Self::Loading;
        }
        if state.products.is_empty()
            && let Some(message) = &state.catalog_error
        {
            return Self::Unavailable(message.clone());
        }

        let cards: Vec<_> = state
            .filtered_products()
            .map(|product| ProductCardView::new(product, &state.cart))
            .collect();

        if cards.is_empty() && !state.products.is_empty() {
            Self::NoMatches {
                query: state.search_query.clone(),
            }
        } else {
            Self::Products(cards)
        }
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format a catalog amount as a price string.
fn format_price(amount: rust_decimal::Decimal) -> String {
    Price::usd(amount).display()
}

fn image_or_placeholder(image: Option<&str>) -> String {
    image.unwrap_or(PLACEHOLDER_IMAGE).to_string()
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let summary = if cart.is_empty() {
            "Your cart is empty".to_string()
        } else {
            format!("{} item(s) in your cart", cart.len())
        };

        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.total()),
            item_count: cart.item_count(),
            summary,
        }
    }
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id,
            title: entry.product.title.clone(),
            quantity: entry.quantity(),
            price: format_price(entry.product.price),
            line_price: format_price(entry.line_total()),
            image: image_or_placeholder(entry.product.image.as_deref()),
        }
    }
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            price: format_price(product.price),
            image: image_or_placeholder(product.image.as_deref()),
            rating: product.rating.rate,
            review_count: product.rating.count,
            in_cart: cart.get(product.id).map_or(0, CartEntry::quantity),
        }
    }
}
