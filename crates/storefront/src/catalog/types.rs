//! Catalog record types.
//!
//! These mirror the JSON the catalog endpoint returns, one object per
//! product, and are the same values the application store keeps in its
//! catalog snapshot.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use scoder_core::ProductId;

// =============================================================================
// Product Types
// =============================================================================

/// A product as returned by the catalog.
///
/// Immutable once fetched; a re-fetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-assigned product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price in dollars. Read and written as a JSON number; negative
    /// prices are rejected.
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "non_negative_price"
    )]
    pub price: Decimal,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Free-text category (e.g. "men's clothing").
    #[serde(default)]
    pub category: String,
    /// Image URL, absent when the catalog sends none or an empty string.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image: Option<String>,
    /// Aggregate customer rating.
    #[serde(default)]
    pub rating: Rating,
}

// =============================================================================
// Rating Types
// =============================================================================

/// Customer rating summary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating on a 0-5 scale.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = rust_decimal::serde::float::deserialize(deserializer)?;
    if price < Decimal::ZERO {
        return Err(D::Error::custom(format!("price must not be negative, got {price}")));
    }
    Ok(price)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
