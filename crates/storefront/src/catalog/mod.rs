//! Remote product catalog.
//!
//! # Architecture
//!
//! - [`CatalogClient`] performs one HTTP GET against the collection endpoint
//!   and caches the raw listing via `moka` for the configured TTL
//! - [`CatalogClient::load`] never fails: errors become an empty
//!   [`Catalog`] flagged with the [`CatalogError`] that caused it
//! - [`Catalog`] is the immutable, session-scoped product list; sale fields
//!   are derived once per load
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let load = client.load().await;
//! if let Some(err) = load.error() {
//!     tracing::warn!("catalog unavailable: {err}");
//! }
//! let catalog = load.into_catalog();
//! ```

mod cache;

use std::collections::HashMap;
use std::sync::Arc;

use moka::future::Cache;
use rand::Rng;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use shopfront_core::{PriceError, Product, ProductId, ProductListing, SALE_PERCENTAGE_RANGE};

use crate::config::CatalogConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("Catalog request timed out")]
    Timeout,

    /// Endpoint answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    /// Payload was not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A listing's derived sale prices are out of range.
    #[error("Invalid listing {id}: {source}")]
    InvalidListing {
        id: ProductId,
        #[source]
        source: PriceError,
    },
}

// =============================================================================
// Catalog
// =============================================================================

/// Synchronous product lookup used when adding to the cart.
pub trait ProductLookup {
    /// Find a product by id.
    fn find_by_id(&self, id: &ProductId) -> Option<&Product>;
}

/// The immutable list of products available for this session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from already-derived products.
    ///
    /// Later duplicates of an id are dropped.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            if catalog.index.contains_key(&product.id) {
                warn!(product_id = %product.id, "Dropping duplicate catalog entry");
                continue;
            }
            catalog
                .index
                .insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }
        catalog
    }

    /// Derive products from upstream listings, drawing each sale percentage
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidListing`] for the first listing whose
    /// derived prices cannot be represented.
    pub fn from_listings<R: Rng>(
        listings: &[ProductListing],
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        let products = listings
            .iter()
            .map(|listing| {
                Product::from_listing(listing.clone(), rng.random_range(SALE_PERCENTAGE_RANGE))
                    .map_err(|source| CatalogError::InvalidListing {
                        id: listing.id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(products))
    }

    /// Products in upstream order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct category names in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for product in &self.products {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Products whose category matches `category` (case-insensitive).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }
}

impl ProductLookup for Catalog {
    fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }
}

/// Outcome of [`CatalogClient::load`].
///
/// On failure the catalog is empty and [`CatalogLoad::error`] says why.
#[derive(Debug)]
pub struct CatalogLoad {
    catalog: Catalog,
    error: Option<CatalogError>,
}

impl CatalogLoad {
    /// A successful load.
    #[must_use]
    pub const fn loaded(catalog: Catalog) -> Self {
        Self {
            catalog,
            error: None,
        }
    }

    /// A failed load with an empty catalog.
    #[must_use]
    pub fn failed(error: CatalogError) -> Self {
        Self {
            catalog: Catalog::default(),
            error: Some(error),
        }
    }

    /// The loaded catalog (empty on failure).
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Why the load failed, if it did.
    #[must_use]
    pub const fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    /// Whether the load failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Take the catalog, discarding the error flag.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote product collection endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    config: CatalogConfig,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// A zero cache TTL disables caching.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(16)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                config: config.clone(),
                cache,
            }),
        })
    }

    /// Fetch the catalog.
    ///
    /// Never fails: network, status, payload, and out-of-range price errors
    /// yield an empty catalog carrying the error.
    #[instrument(skip(self), fields(url = %self.inner.config.url))]
    pub async fn load(&self) -> CatalogLoad {
        let derived = self
            .fetch_listings()
            .await
            .and_then(|listings| derive_catalog(&listings));
        match derived {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                CatalogLoad::loaded(catalog)
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                CatalogLoad::failed(e)
            }
        }
    }

    /// Drop any cached listing so the next load hits the network.
    pub async fn invalidate(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate(&self.cache_key()).await;
        }
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::Listings(self.inner.config.url.to_string())
    }

    async fn fetch_listings(&self) -> Result<Arc<Vec<ProductListing>>, CatalogError> {
        let cache_key = self.cache_key();

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Listings(listings)) = cache.get(&cache_key).await
        {
            debug!("Cache hit for catalog listing");
            return Ok(listings);
        }

        let mut request = self.inner.client.get(self.inner.config.url.clone());
        if let Some(token) = &self.inner.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let listings: Vec<ProductListing> = serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;
        let listings = Arc::new(listings);

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(cache_key, CacheValue::Listings(Arc::clone(&listings)))
                .await;
        }

        Ok(listings)
    }
}

/// Derive a catalog with fresh sale percentages from the thread RNG.
fn derive_catalog(listings: &[ProductListing]) -> Result<Catalog, CatalogError> {
    Catalog::from_listings(listings, &mut rand::rng())
}

fn classify(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Http(e)
    }
}
