//! The storefront context shared by front ends.

use std::sync::Arc;

use crate::catalog::{self, CatalogClient, CatalogError, CatalogLoad};
use crate::config::StorefrontConfig;
use crate::models::User;
use crate::services::{AuthService, CartService, CheckoutService};
use crate::session::{FileStore, KeyValueStore, SessionHolder};
use crate::store::Store;
use crate::views::{CartView, CatalogView};

/// Everything a front end needs: configuration, the application store,
/// the catalog client and the session holder.
///
/// This struct is cheaply cloneable via `Arc`. The session holder is
/// registered as a store observer, so every user change is persisted.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    store: Store,
    catalog: CatalogClient,
    session: SessionHolder,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.inner.config)
            .field("store", &self.inner.store)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a storefront backed by `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let session = SessionHolder::new(storage);
        let store = Store::default().with_observer(Arc::new(session.clone()));

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                store,
                catalog,
                session,
            }),
        })
    }

    /// Create a storefront that keeps its session under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn open(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::new(config, storage)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the application store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the session holder.
    #[must_use]
    pub fn session(&self) -> &SessionHolder {
        &self.inner.session
    }

    /// Restore the user saved by a previous run.
    pub fn restore_session(&self) -> Option<User> {
        self.inner.session.restore(&self.inner.store)
    }

    /// Fetch the catalog if the store does not have one yet.
    pub async fn load_catalog(&self) -> CatalogLoad {
        catalog::load_catalog(&self.inner.store, &self.inner.catalog).await
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.store, self.inner.config.auth_delay)
    }

    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(&self.inner.store)
    }

    #[must_use]
    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(&self.inner.store, self.inner.config.checkout_delay)
    }

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        self.inner.store.with_state(|state| CartView::from(&state.cart))
    }

    #[must_use]
    pub fn catalog_view(&self) -> CatalogView {
        self.inner.store.with_state(CatalogView::from_state)
    }
}
