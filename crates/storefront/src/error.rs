//! Unified error handling.
//!
//! Provides a unified `AppError` type for every fallible storefront
//! operation. Most errors are shown to the shopper as-is; see
//! [`AppError::is_user_facing`].

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::{AuthError, CheckoutError};
use crate::session::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog fetch failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the shopper caused this error (bad input, missing login)
    /// rather than the environment.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Checkout(_) | Self::NotFound(_))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
