//! Cache types for catalog responses.

use std::sync::Arc;

use shopfront_core::ProductListing;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Full listing fetched from a collection endpoint.
    Listings(String),
}

/// Cached value types.
///
/// Only raw listings are cached; sale fields are derived on every load.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Listings(Arc<Vec<ProductListing>>),
}
