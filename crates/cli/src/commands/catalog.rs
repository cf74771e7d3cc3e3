//! Catalog listing.
//!
//! # Usage
//!
//! ```bash
//! scoder products
//! scoder products --search "men's"
//! ```
//!
//! # Environment Variables
//!
//! - `SCODER_CATALOG_URL` - Catalog endpoint to list

use std::io::Write;

use scoder_storefront::Storefront;
use scoder_storefront::catalog::CatalogLoad;
use scoder_storefront::store::Action;

use super::{CliError, render_catalog};

/// Fetch the catalog and print the products matching `search`.
pub async fn products(
    storefront: &Storefront,
    search: Option<String>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    storefront.restore_session();

    if let CatalogLoad::Loaded(count) = storefront.load_catalog().await {
        tracing::debug!(count, "Catalog ready");
    }
    if let Some(query) = search {
        storefront.store().dispatch(Action::SetSearchQuery(query));
    }

    render_catalog(out, &storefront.catalog_view())?;
    Ok(())
}
