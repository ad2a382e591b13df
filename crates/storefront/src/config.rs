//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_CATALOG_URL` - Product collection endpoint
//!   (default: <https://fakestoreapi.com/products/category/electronics>)
//! - `SHOPFRONT_CATALOG_TOKEN` - Bearer token sent with catalog requests
//! - `SHOPFRONT_CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: none)
//! - `SHOPFRONT_CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SHOPFRONT_STORAGE_DIR` - Directory holding the durable cart slot
//!   (default: `.shopfront`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default product collection endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products/category/electronics";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_STORAGE_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but unusable (name, reason).
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopfront application configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Remote catalog configuration
    pub catalog: CatalogConfig,
    /// Directory holding the durable cart slot
    pub storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Remote catalog configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Collection endpoint returning a JSON array of products
    pub url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// How long a fetched listing is reused
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl CatalogConfig {
    /// Catalog configuration for `url` with defaults for everything else.
    #[must_use]
    pub const fn for_url(url: Url) -> Self {
        Self {
            url,
            token: None,
            timeout: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url_raw = lookup("SHOPFRONT_CATALOG_URL")
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let url = Url::parse(&url_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_CATALOG_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_CATALOG_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let timeout = parse_optional_secs(&lookup, "SHOPFRONT_CATALOG_TIMEOUT_SECS")?;
        let cache_ttl = parse_optional_secs(&lookup, "SHOPFRONT_CATALOG_CACHE_TTL_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS));

        let catalog = CatalogConfig {
            url,
            token: lookup("SHOPFRONT_CATALOG_TOKEN")
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            timeout,
            cache_ttl,
        };

        let storage_dir = lookup("SHOPFRONT_STORAGE_DIR")
            .filter(|d| !d.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        Ok(Self {
            catalog,
            storage_dir,
            sentry_dsn: lookup("SENTRY_DSN").filter(|d| !d.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional whole number of seconds.
fn parse_optional_secs<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}
