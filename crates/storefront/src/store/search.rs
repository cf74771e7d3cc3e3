//! Catalog search filter.

use crate::catalog::Product;

/// Products whose title or category contains `query`, ignoring case.
///
/// An empty query matches every product. The result is computed lazily on
/// each call; nothing is cached.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
) -> impl Iterator<Item = &'a Product> + use<'a> {
    let needle = query.to_lowercase();
    products.iter().filter(move |product| matches(product, &needle))
}

fn matches(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.title.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}
