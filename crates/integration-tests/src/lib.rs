//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Tests run against [`FakeCatalog`], an in-process HTTP server bound to an
//! ephemeral localhost port, so no network access is needed.
//!
//! # Test Categories
//!
//! - `catalog_fetch` - Catalog client against success, failure, and cache scenarios
//! - `cart_flow` - Cart operations, totals, and checkout over a real catalog
//! - `persistence` - Durable cart storage and malformed stored data

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

use shopfront_storefront::config::CatalogConfig;

/// How the fake catalog answers `GET /products`.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// 200 with this JSON body.
    Products(Value),
    /// Bare status code with no body.
    Status(u16),
    /// 200 with this raw body.
    Raw(String),
    /// 200 with this JSON body after a delay.
    Slow(Duration, Value),
}

#[derive(Clone)]
struct FakeState {
    behavior: Arc<Behavior>,
    hits: Arc<AtomicUsize>,
    last_authorization: Arc<Mutex<Option<String>>>,
}

/// In-process product collection endpoint.
pub struct FakeCatalog {
    url: Url,
    state: FakeState,
    task: JoinHandle<()>,
}

impl FakeCatalog {
    /// Bind to `127.0.0.1:0` and serve `behavior` at `/products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(behavior: Behavior) -> std::io::Result<Self> {
        let state = FakeState {
            behavior: Arc::new(behavior),
            hits: Arc::new(AtomicUsize::new(0)),
            last_authorization: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/products", get(products))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = Url::parse(&format!("http://{addr}/products")).map_err(std::io::Error::other)?;

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { url, state, task })
    }

    /// Endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Catalog configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::for_url(self.url.clone())
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.state
            .last_authorization
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn products(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut last) = state.last_authorization.lock() {
        *last = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
    }

    match state.behavior.as_ref() {
        Behavior::Products(body) => axum::Json(body.clone()).into_response(),
        Behavior::Status(code) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Behavior::Raw(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        Behavior::Slow(delay, body) => {
            tokio::time::sleep(*delay).await;
            axum::Json(body.clone()).into_response()
        }
    }
}

/// A small electronics listing in the upstream wire shape.
#[must_use]
pub fn electronics_listing() -> Value {
    json!([
        {
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg"
        },
        {
            "id": 10,
            "title": "SanDisk SSD PLUS 1TB Internal SSD - SATA III 6 Gb/s",
            "price": 109,
            "description": "Easy upgrade for faster boot up",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61U7T1koQqL._AC_SX679_.jpg"
        },
        {
            "id": 14,
            "title": "Samsung 49-Inch CHG90 144Hz Curved Gaming Monitor",
            "price": 999.99,
            "description": "49 inch super ultrawide 32:9 curved gaming monitor",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/81Zt42ioCgL._AC_SX679_.jpg"
        }
    ])
}
