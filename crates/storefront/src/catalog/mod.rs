//! Product catalog client and fetch bridge.
//!
//! # Architecture
//!
//! - One unauthenticated `GET` against the configured endpoint returns the
//!   whole catalog as a JSON array; there is no pagination
//! - Successful responses are cached in memory via `moka` (configurable TTL)
//! - [`load_catalog`] connects the client to the application store: it
//!   drives the loading flag and either replaces the catalog snapshot or
//!   records the failure in `catalog_error`
//!
//! # Example
//!
//! ```rust,ignore
//! use scoder_storefront::catalog::{CatalogClient, load_catalog};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let outcome = load_catalog(&store, &client).await;
//! ```

mod types;

use std::sync::Arc;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

pub use types::{Product, Rating};

use crate::config::CatalogConfig;
use crate::store::{Action, Store};

const USER_AGENT: &str = concat!("scoder-storefront/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog endpoint.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.endpoint.clone(),
                cache,
            }),
        })
    }

    /// The configured catalog endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint answers with a
    /// non-success status, or the body is not a JSON array of products.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = self.inner.endpoint.to_string();

        if let Some(products) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for catalog");
            return Ok(products.as_ref().clone());
        }

        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        let products: Vec<Product> = match serde_json::from_str(&response_text) {
            Ok(products) => products,
            Err(e) => {
                error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                return Err(CatalogError::Parse(e));
            }
        };

        self.inner
            .cache
            .insert(cache_key, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    /// Drop any cached catalog so the next fetch hits the network.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(self.inner.endpoint.as_str()).await;
    }
}

// =============================================================================
// Fetch bridge
// =============================================================================

/// What [`load_catalog`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoad {
    /// The store already had a catalog; nothing was fetched.
    Skipped,
    /// The catalog was fetched and stored.
    Loaded(usize),
    /// The fetch failed; the message is also in `catalog_error`.
    Failed(String),
}

/// Populate the store's catalog snapshot if it is empty.
///
/// Sets the loading flag for the duration of the fetch. On failure the
/// catalog stays empty and the error is recorded in the state.
#[instrument(skip_all)]
pub async fn load_catalog(store: &Store, client: &CatalogClient) -> CatalogLoad {
    if store.with_state(|state| !state.products.is_empty()) {
        debug!("Catalog already loaded");
        return CatalogLoad::Skipped;
    }

    store.dispatch(Action::SetLoading(true));

    let outcome = match client.fetch_products().await {
        Ok(products) => {
            let count = products.len();
            info!(count, "Catalog loaded");
            store.dispatch(Action::SetCatalogError(None));
            store.dispatch(Action::SetProducts(products));
            CatalogLoad::Loaded(count)
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch products");
            let message = e.to_string();
            store.dispatch(Action::SetCatalogError(Some(message.clone())));
            CatalogLoad::Failed(message)
        }
    };

    store.dispatch(Action::SetLoading(false));
    outcome
}
