//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartLineItem, CartState, CartStateError, CartTotals, CheckoutSummary, LineChange};
pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::{Product, ProductListing, SALE_PERCENTAGE_RANGE};
