//! Scoder Core - Shared types library.
//!
//! This crate provides the small vocabulary shared by the storefront library
//! and the `scoder` command-line shell:
//! - `storefront` - Application store, catalog bridge, session persistence
//! - `cli` - Interactive shopping shell and account commands
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product/user IDs, prices and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
