//! Shopfront Core - Shared cart and catalog types.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - Catalog client, cart store, and cart persistence
//! - `cli` - Terminal front end driving the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows the
//! cart rules to be tested without any collaborators.
//!
//! # Modules
//!
//! - [`types`] - Product identity, prices, products, and cart state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
