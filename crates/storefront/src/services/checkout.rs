//! Simulated checkout.
//!
//! Validates the payment form, waits out a fake processing delay and empties
//! the cart. Nothing is charged and nothing is sent anywhere; the returned
//! confirmation exists only for display.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use scoder_core::ProductId;

use crate::store::{Action, Cart, Store};

/// Errors that can occur during checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to pay for.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The selected payment method is missing required fields.
    #[error("Please fill in all required payment details")]
    IncompletePaymentDetails,

    /// Unrecognized payment method name.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

// =============================================================================
// Payment form
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Credit,
    Debit,
    Pix,
    Boleto,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [Self::Credit, Self::Debit, Self::Pix, Self::Boleto];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Pix => "pix",
            Self::Boleto => "boleto",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Credit Card",
            Self::Debit => "Debit Card",
            Self::Pix => "PIX",
            Self::Boleto => "Boleto",
        }
    }

    /// Whether this method needs card details.
    #[must_use]
    pub const fn uses_card(self) -> bool {
        matches!(self, Self::Credit | Self::Debit)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CheckoutError::UnknownPaymentMethod(s.to_string()))
    }
}

/// Submitted payment form.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub payment_method: PaymentMethod,
    pub card_number: Option<String>,
    pub card_name: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub pix_key: Option<String>,
}

impl CheckoutForm {
    /// Check that the fields the payment method needs are filled in.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::IncompletePaymentDetails` otherwise.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let complete = match self.payment_method {
            PaymentMethod::Credit | PaymentMethod::Debit => [
                &self.card_number,
                &self.card_name,
                &self.card_expiry,
                &self.card_cvv,
            ]
            .into_iter()
            .all(|field| filled(field.as_deref())),
            PaymentMethod::Pix => filled(self.pix_key.as_deref()),
            PaymentMethod::Boleto => true,
        };

        if complete {
            Ok(())
        } else {
            Err(CheckoutError::IncompletePaymentDetails)
        }
    }
}

fn filled(field: Option<&str>) -> bool {
    field.is_some_and(|value| !value.is_empty())
}

// =============================================================================
// Order confirmation
// =============================================================================

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Receipt for a completed (simulated) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub item_count: u64,
}

impl OrderConfirmation {
    fn from_cart(cart: &Cart, payment_method: PaymentMethod) -> Self {
        let lines = cart
            .entries()
            .iter()
            .map(|entry| OrderLine {
                product_id: entry.product.id,
                title: entry.product.title.clone(),
                unit_price: entry.product.price,
                quantity: entry.quantity(),
                line_total: entry.line_total(),
            })
            .collect();

        Self {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            payment_method,
            lines,
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// CheckoutService
// =============================================================================

/// Checkout service.
pub struct CheckoutService<'a> {
    store: &'a Store,
    delay: Duration,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Pay for the current cart.
    ///
    /// Always succeeds once the form is valid; the cart is cleared when the
    /// simulated payment completes and the confirmation lists what it held
    /// at that moment.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to pay for
    /// (before or after the payment delay) and
    /// `CheckoutError::IncompletePaymentDetails` if the form is incomplete.
    #[instrument(skip_all, fields(payment_method = %form.payment_method))]
    pub async fn checkout(&self, form: &CheckoutForm) -> Result<OrderConfirmation, CheckoutError> {
        if self.store.with_state(|state| state.cart.is_empty()) {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate()?;

        // Simulated payment processing
        tokio::time::sleep(self.delay).await;

        // The cart may have changed during the delay; bill what is cleared
        let Some(previous) = self.store.replace(Action::ClearCart) else {
            return Err(CheckoutError::EmptyCart);
        };
        let confirmation = OrderConfirmation::from_cart(&previous.cart, form.payment_method);

        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            items = confirmation.item_count,
            "Order placed"
        );
        Ok(confirmation)
    }
}
