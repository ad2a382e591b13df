//! Durable storage for the cart.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the durable slot abstraction (files, memory, or any
//!   browser-style key-value store)
//! - [`CartPersistence`] serializes [`CartState`] to the single `"cart"` slot
//! - Loading never fails: absent, unparseable, or invalid data yields an
//!   empty cart
//!
//! The stored value is a JSON object keyed by stringified product id, each
//! value holding the product snapshot fields plus `quantity`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt::Debug;

use thiserror::Error;
use tracing::{debug, warn};

use shopfront_core::CartState;

/// Name of the slot holding the serialized cart.
pub const CART_SLOT: &str = "cart";

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value does not fit in the remaining capacity.
    #[error("Quota exceeded: need {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// The backend cannot be used at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while persisting the cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Backend read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store with named slots.
///
/// Methods take `&self`; implementations use interior mutability where they
/// need it.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value in `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value in `key`.
    ///
    /// A failed write must leave the previous value in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Empty the slot. Succeeds if it was already empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and writes [`CartState`] in the [`CART_SLOT`] of a store.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored cart, degrading to an empty cart on any failure.
    ///
    /// A stored value that fails to decode or validate is removed from the
    /// slot. A backend read failure leaves the slot alone.
    #[must_use]
    pub fn load(&self) -> CartState {
        match self.try_load() {
            Ok(state) => {
                debug!(lines = state.len(), "Hydrated cart from storage");
                state
            }
            Err(PersistenceError::Json(e)) => {
                warn!(error = %e, "Discarding invalid stored cart");
                if let Err(e) = self.store.remove(CART_SLOT) {
                    warn!(error = %e, "Failed to clear invalid stored cart");
                }
                CartState::new()
            }
            Err(e) => {
                warn!(error = %e, "Stored cart unreadable");
                CartState::new()
            }
        }
    }

    /// Load the stored cart, surfacing why it could not be read.
    ///
    /// An empty slot is not an error and yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or fails validation.
    pub fn try_load(&self) -> Result<CartState, PersistenceError> {
        let Some(raw) = self.store.get(CART_SLOT)? else {
            return Ok(CartState::new());
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write `state` to the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails; the previous
    /// stored value is left untouched in that case.
    pub fn save(&self, state: &CartState) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(state)?;
        self.store.set(CART_SLOT, &raw)?;
        Ok(())
    }
}
