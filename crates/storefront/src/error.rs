//! Unified error type for Shopfront front ends.
//!
//! Cart and catalog operations never return these: they degrade to no-ops,
//! empty values, or error-flagged results. This type covers setup and the
//! explicit `try_*` operations a front end may choose to surface.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog client could not be built or fetched.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Stored cart could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A view could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Shopper asked for something the cart cannot do.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
