//! Display data for the presentation layer.
//!
//! These types map catalog and cart state to ready-to-render strings. They
//! carry no markup; the presentation layer decides how to draw them.

use serde::Serialize;

use shopfront_core::{CartLineItem, CartState, CheckoutSummary, Price, Product};

use crate::catalog::CatalogLoad;

/// Toast shown after a successful add.
pub const ADDED_FEEDBACK: &str = "Item added to cart!";

/// Message shown when the catalog fetch failed.
pub const CATALOG_ERROR_MESSAGE: &str = "Error loading products. Please try again later.";

/// Message shown when the catalog loaded but is empty.
pub const CATALOG_EMPTY_MESSAGE: &str = "No products available";

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub category: String,
    pub price: String,
    pub previous_price: String,
    pub savings: String,
    pub badge: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            previous_price: product.previous_price.to_string(),
            savings: format!("Save {}", product.discount),
            badge: format!("{}% OFF", product.sale_percentage),
        }
    }
}

/// Catalog display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogView {
    /// Fetch still pending.
    Loading,
    /// Fetch failed.
    Error { message: String },
    /// Fetch succeeded with no products.
    Empty { message: String },
    /// Products to render, in catalog order.
    Products { products: Vec<ProductCardView> },
}

impl CatalogView {
    /// Build the view for a finished load, optionally filtered by category.
    #[must_use]
    pub fn from_load(load: &CatalogLoad, category: Option<&str>) -> Self {
        if load.is_error() {
            return Self::Error {
                message: CATALOG_ERROR_MESSAGE.to_string(),
            };
        }

        let catalog = load.catalog();
        let products: Vec<ProductCardView> = match category {
            Some(category) => catalog.in_category(category).map(Into::into).collect(),
            None => catalog.products().iter().map(Into::into).collect(),
        };

        if products.is_empty() {
            Self::Empty {
                message: CATALOG_EMPTY_MESSAGE.to_string(),
            }
        } else {
            Self::Products { products }
        }
    }
}

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Quantity the "-" control sets (0 removes the line).
    pub decrement_to: i64,
    /// Quantity the "+" control sets.
    pub increment_to: i64,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let quantity = line.quantity.get();
        Self {
            id: line.product.id.to_string(),
            title: line.product.title.clone(),
            image: line.product.image.clone(),
            quantity,
            price: line.product.price.to_string(),
            line_price: line.line_total().to_string(),
            decrement_to: i64::from(quantity) - 1,
            increment_to: i64::from(quantity) + 1,
        }
    }
}

/// Cart panel display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
    /// Whether the count badge is shown.
    pub badge_visible: bool,
    /// Whether the checkout control is enabled.
    pub checkout_enabled: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Price::ZERO.to_string(),
            item_count: 0,
            badge_visible: false,
            checkout_enabled: false,
        }
    }
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        let totals = state.totals();
        Self {
            items: state.lines().map(CartItemView::from).collect(),
            total: totals.total.to_string(),
            item_count: totals.item_count,
            badge_visible: !totals.is_empty(),
            checkout_enabled: !totals.is_empty(),
        }
    }
}

/// Checkout confirmation display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutConfirmationView {
    pub order_reference: String,
    pub headline: String,
    pub detail: String,
    pub footer: String,
}

impl From<&CheckoutSummary> for CheckoutConfirmationView {
    fn from(summary: &CheckoutSummary) -> Self {
        Self {
            order_reference: summary.order_reference.to_string(),
            headline: "Thank you for your purchase!".to_string(),
            detail: format!(
                "{} item(s) - Total: {}",
                summary.item_count, summary.total
            ),
            footer: "Your order has been placed successfully.".to_string(),
        }
    }
}
