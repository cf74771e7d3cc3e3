//! Integration tests for the catalog client and fetch bridge.
//!
//! The catalog is served by a local stub, so these run without network
//! access.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use scoder_core::ProductId;
use scoder_integration_tests::{CatalogStub, StatusCode, fakestore_products, test_config};
use scoder_storefront::Storefront;
use scoder_storefront::catalog::{CatalogClient, CatalogError, CatalogLoad, Product};
use scoder_storefront::config::CatalogConfig;
use scoder_storefront::session::MemoryStore;
use scoder_storefront::store::Action;
use scoder_storefront::views::CatalogView;

fn storefront(url: &str) -> Storefront {
    let dir = std::env::temp_dir();
    Storefront::new(
        test_config(url, &dir).unwrap(),
        Arc::new(MemoryStore::new()),
    )
    .unwrap()
}

// ============================================================================
// Fetch Bridge
// ============================================================================

#[tokio::test]
async fn test_load_catalog_populates_store() {
    let stub = CatalogStub::with_products().await.unwrap();
    let storefront = storefront(&stub.url());

    let mut updates = storefront.store().subscribe();
    let outcome = storefront.load_catalog().await;

    assert_eq!(outcome, CatalogLoad::Loaded(3));
    let state = storefront.store().state();
    assert_eq!(state.products.len(), 3);
    assert!(!state.loading);
    assert!(state.catalog_error.is_none());
    assert!(updates.has_changed().unwrap());

    let backpack = state.product(ProductId::new(1)).unwrap();
    assert_eq!(backpack.price, Decimal::new(10995, 2));
    assert_eq!(backpack.rating.count, 120);

    let bracelet = state.product(ProductId::new(5)).unwrap();
    assert_eq!(bracelet.price, Decimal::new(695, 0));
    assert!(bracelet.image.is_none());
}

#[tokio::test]
async fn test_load_catalog_is_gated_on_empty_catalog() {
    let stub = CatalogStub::with_products().await.unwrap();
    let storefront = storefront(&stub.url());

    assert_eq!(storefront.load_catalog().await, CatalogLoad::Loaded(3));
    assert_eq!(storefront.load_catalog().await, CatalogLoad::Skipped);
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_store_stays_usable_while_fetch_is_in_flight() {
    let stub = CatalogStub::held_products().await.unwrap();
    let storefront = storefront(&stub.url());
    let products: Vec<Product> = serde_json::from_value(fakestore_products()).unwrap();
    let bracelet = products[2].clone();

    let mut updates = storefront.store().subscribe();
    let (outcome, ()) = tokio::join!(storefront.load_catalog(), async {
        updates.wait_for(|state| state.loading).await.unwrap();
        // The request is now parked in the stub
        while stub.hits() == 0 {
            tokio::task::yield_now().await;
        }

        let store = storefront.store();
        store.dispatch(Action::AddToCart(bracelet.clone()));
        store.dispatch(Action::SetSearchQuery("dragon".to_string()));

        let state = store.state();
        assert!(state.loading);
        assert!(state.products.is_empty());
        assert_eq!(state.cart.item_count(), 1);

        stub.release();
    });

    assert_eq!(outcome, CatalogLoad::Loaded(3));
    let state = storefront.store().state();
    assert!(!state.loading);
    assert_eq!(state.products.len(), 3);
    assert_eq!(state.search_query, "dragon");
    assert_eq!(state.cart.item_count(), 1);
    assert_eq!(state.cart.entries()[0].product, bracelet);
}

#[tokio::test]
async fn test_server_error_leaves_catalog_empty() {
    let stub = CatalogStub::start(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#)
        .await
        .unwrap();
    let storefront = storefront(&stub.url());

    let outcome = storefront.load_catalog().await;

    let CatalogLoad::Failed(message) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("500"));

    let state = storefront.store().state();
    assert!(state.products.is_empty());
    assert!(!state.loading);
    assert_eq!(state.catalog_error.as_deref(), Some(message.as_str()));
    assert!(matches!(
        storefront.catalog_view(),
        CatalogView::Unavailable(_)
    ));
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let stub = CatalogStub::start(StatusCode::OK, r#"{"products": []}"#).await.unwrap();
    let client = CatalogClient::new(&CatalogConfig {
        endpoint: stub.url().parse().unwrap(),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap();

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and immediately drop a listener to get a port nobody is on
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let storefront = storefront(&format!("http://{addr}/products"));

    let outcome = storefront.load_catalog().await;
    assert!(matches!(outcome, CatalogLoad::Failed(_)));
    assert!(storefront.store().state().catalog_error.is_some());
}

#[tokio::test]
async fn test_successful_retry_clears_error() {
    let failing = CatalogStub::start(StatusCode::SERVICE_UNAVAILABLE, "")
        .await
        .unwrap();
    let storefront = storefront(&failing.url());
    assert!(matches!(
        storefront.load_catalog().await,
        CatalogLoad::Failed(_)
    ));

    // Same store, healthy catalog
    let healthy = CatalogStub::with_products().await.unwrap();
    let client = CatalogClient::new(&CatalogConfig {
        endpoint: healthy.url().parse().unwrap(),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap();
    let outcome = scoder_storefront::catalog::load_catalog(storefront.store(), &client).await;

    assert_eq!(outcome, CatalogLoad::Loaded(3));
    assert!(storefront.store().state().catalog_error.is_none());
}

// ============================================================================
// Client Cache
// ============================================================================

#[tokio::test]
async fn test_client_caches_until_invalidated() {
    let stub = CatalogStub::with_products().await.unwrap();
    let client = CatalogClient::new(&CatalogConfig {
        endpoint: stub.url().parse().unwrap(),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap();

    let first = client.fetch_products().await.unwrap();
    let second = client.fetch_products().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(stub.hits(), 1);

    client.invalidate().await;
    client.fetch_products().await.unwrap();
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn test_search_over_loaded_catalog() {
    let stub = CatalogStub::with_products().await.unwrap();
    let storefront = storefront(&stub.url());
    storefront.load_catalog().await;

    let store = storefront.store();
    assert_eq!(store.filtered_products().len(), 3);

    store.dispatch(Action::SetSearchQuery("MEN'S CLOTHING".to_string()));
    let ids: Vec<_> = store.filtered_products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);

    store.dispatch(Action::SetSearchQuery("dragon".to_string()));
    let ids: Vec<_> = store.filtered_products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId::new(5)]);
}
