//! Integration tests for the Scoder storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p scoder-integration-tests
//! ```
//!
//! The tests need no network access: the catalog is served by
//! [`CatalogStub`], a one-route axum server on a random localhost port.
//!
//! # Test Categories
//!
//! - `catalog_fetch` - Catalog client and fetch bridge against the stub
//! - `session_restore` - Session persistence across storefront restarts
//! - `shopping_flow` - Login, cart edits, checkout and logout end to end

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

pub use axum::http::StatusCode;

use scoder_storefront::config::{ConfigError, StorefrontConfig};

/// Catalog server answering `GET /products` with a fixed response.
pub struct CatalogStub {
    addr: SocketAddr,
    state: StubState,
    task: JoinHandle<()>,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Arc<str>,
    hits: Arc<AtomicUsize>,
    /// Requests wait for a permit until the semaphore is closed.
    gate: Arc<Semaphore>,
}

impl CatalogStub {
    /// Serve `body` as JSON with the given status code.
    ///
    /// # Errors
    ///
    /// Returns an error if no localhost port can be bound.
    pub async fn start(status: StatusCode, body: impl Into<String>) -> io::Result<Self> {
        let gate = Semaphore::new(0);
        gate.close();
        Self::serve(status, body.into(), gate).await
    }

    /// Serve `fakestore_products()`.
    ///
    /// # Errors
    ///
    /// Returns an error if no localhost port can be bound.
    pub async fn with_products() -> io::Result<Self> {
        Self::start(StatusCode::OK, fakestore_products().to_string()).await
    }

    /// Serve `fakestore_products()`, but hold every response until
    /// [`CatalogStub::release`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if no localhost port can be bound.
    pub async fn held_products() -> io::Result<Self> {
        Self::serve(
            StatusCode::OK,
            fakestore_products().to_string(),
            Semaphore::new(0),
        )
        .await
    }

    async fn serve(status: StatusCode, body: String, gate: Semaphore) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = StubState {
            status,
            body: Arc::from(body),
            hits: Arc::new(AtomicUsize::new(0)),
            gate: Arc::new(gate),
        };
        let app = Router::new()
            .route("/products", get(products))
            .with_state(state.clone());

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, task })
    }

    /// Let held responses through, now and from then on.
    pub fn release(&self) {
        self.state.gate.close();
    }

    /// URL of the products route.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/products", self.addr)
    }

    /// Number of requests received so far, including held ones.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn products(State(stub): State<StubState>) -> impl IntoResponse {
    stub.hits.fetch_add(1, Ordering::SeqCst);

    // Fails immediately once the gate is closed
    let _ = stub.gate.acquire().await;

    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body.to_string(),
    )
}

/// Configuration pointing at `catalog_url`, storing sessions in `data_dir`,
/// with no simulated latency.
///
/// # Errors
///
/// Returns an error if `catalog_url` is not a valid HTTP URL.
pub fn test_config(catalog_url: &str, data_dir: &Path) -> Result<StorefrontConfig, ConfigError> {
    let data_dir = data_dir.to_string_lossy().into_owned();
    StorefrontConfig::from_lookup(|key| match key {
        "SCODER_CATALOG_URL" => Some(catalog_url.to_string()),
        "SCODER_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .map(StorefrontConfig::without_delays)
}

/// Three products in the shape the public catalog returns.
#[must_use]
pub fn fakestore_products() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 5,
            "title": "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection.",
            "category": "jewelery",
            "image": "",
            "rating": { "rate": 4.6, "count": 400 }
        }
    ])
}
