//! CLI commands and terminal rendering.

pub mod account;
pub mod catalog;
pub mod shell;

use std::io::{self, Write};

use thiserror::Error;

use scoder_storefront::AppError;
use scoder_storefront::services::OrderConfirmation;
use scoder_storefront::views::{CartView, CatalogView};

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The message to show the shopper for `err`, without the error category
/// prefix.
pub fn user_message(err: &AppError) -> String {
    match err {
        AppError::Auth(e) => e.to_string(),
        AppError::Checkout(e) => e.to_string(),
        AppError::NotFound(what) => what.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render_catalog(out: &mut impl Write, view: &CatalogView) -> io::Result<()> {
    match view {
        CatalogView::Loading => writeln!(out, "Loading products..."),
        CatalogView::Unavailable(message) => {
            writeln!(out, "Products are unavailable right now ({message})")
        }
        CatalogView::NoMatches { query } => writeln!(out, "No products match \"{query}\""),
        CatalogView::Products(cards) if cards.is_empty() => writeln!(out, "No products"),
        CatalogView::Products(cards) => {
            for card in cards {
                write!(
                    out,
                    "{:>4}  {:>9}  {}  [{}]  rating {:.1} ({} reviews)",
                    card.id, card.price, card.title, card.category, card.rating, card.review_count
                )?;
                if card.in_cart > 0 {
                    write!(out, "  x{} in cart", card.in_cart)?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

pub fn render_cart(out: &mut impl Write, view: &CartView) -> io::Result<()> {
    writeln!(out, "{}", view.summary)?;
    if view.is_empty() {
        return Ok(());
    }
    for item in &view.items {
        writeln!(
            out,
            "{:>4}  {}  {} x {} = {}",
            item.product_id, item.title, item.price, item.quantity, item.line_price
        )?;
    }
    writeln!(out, "Total: {}", view.subtotal)
}

pub fn render_confirmation(out: &mut impl Write, order: &OrderConfirmation) -> io::Result<()> {
    writeln!(out, "Order Complete!")?;
    writeln!(
        out,
        "Thank you for your purchase. Your order has been processed successfully."
    )?;
    writeln!(
        out,
        "Order {} - {} item(s), {} paid by {}",
        order.order_id,
        order.item_count,
        scoder_core::Price::usd(order.total),
        order.payment_method.label()
    )
}
