//! Shopfront Storefront library.
//!
//! This crate provides the storefront behaviour behind any front end:
//! - [`catalog`] - Fetch and hold the session's product catalog
//! - [`cart`] - Cart store with write-through persistence and change notifications
//! - [`persistence`] - Durable key-value slot for the cart
//! - [`views`] - Display data for rendering catalog and cart
//! - [`session`] - Startup wiring of catalog and cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod session;
pub mod views;

pub use cart::{AddOutcome, CartChanged, CartStore};
pub use catalog::{Catalog, CatalogClient, CatalogError, CatalogLoad, ProductLookup};
pub use config::ShopfrontConfig;
pub use error::{Error, Result};
pub use persistence::{CartPersistence, FileStore, KeyValueStore, MemoryStore};
pub use session::ShopSession;
