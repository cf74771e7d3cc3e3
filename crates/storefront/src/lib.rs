//! Scoder storefront library.
//!
//! The state core of the storefront: a reducer-driven application store
//! holding the session, catalog, search query and cart, plus the catalog
//! fetch bridge, session persistence, mock auth and simulated checkout
//! services built on top of it.
//!
//! Front ends construct a [`Storefront`] and work through its services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
mod context;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod store;
pub mod views;

pub use context::Storefront;
pub use error::{AppError, Result};
