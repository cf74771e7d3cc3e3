//! Cart ledger.
//!
//! The cart is an insertion-ordered list of entries, at most one per
//! product, with a total that is recomputed after every mutation. There is
//! no way to set the total directly.

use rust_decimal::Decimal;

use scoder_core::ProductId;

use crate::catalog::Product;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    /// The product as it was when first added.
    pub product: Product,
    quantity: u32,
}

impl CartEntry {
    const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Number of units of this product. Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The shopping cart.
///
/// `Cart::default()` is the empty cart with a zero total.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
    total: Decimal,
}

impl Cart {
    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Sum of `price * quantity` over all entries.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units across all entries (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product.id == product_id)
    }

    /// Add one unit of `product`, appending a new entry if the product is
    /// not in the cart yet.
    pub fn add(&mut self, product: Product) {
        match self.position(product.id) {
            Some(index) => {
                if let Some(entry) = self.entries.get_mut(index) {
                    entry.quantity = entry.quantity.saturating_add(1);
                }
            }
            None => self.entries.push(CartEntry::new(product)),
        }
        self.recompute_total();
    }

    /// Remove the entry for `product_id`.
    ///
    /// Returns `false` (and leaves the cart untouched) if there was none.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        self.entries.remove(index);
        self.recompute_total();
        true
    }

    /// Set the quantity for `product_id`. A quantity of zero or less removes
    /// the entry.
    ///
    /// Returns `false` (and leaves the cart untouched) if the product is not
    /// in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        if quantity <= 0 {
            self.entries.remove(index);
        } else if let Some(entry) = self.entries.get_mut(index) {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.recompute_total();
        true
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product.id == product_id)
    }

    fn recompute_total(&mut self) {
        self.total = self.entries.iter().map(CartEntry::line_total).sum();
    }
}
