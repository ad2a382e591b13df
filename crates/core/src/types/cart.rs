//! Cart state and its pure mutation rules.
//!
//! [`CartState`] maps product ids to [`CartLineItem`]s. Quantities are
//! `NonZeroU32`, so a line item with quantity zero cannot be represented:
//! driving a quantity to zero or below removes the line instead.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A product snapshot paired with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Snapshot of the product at the time it was first added.
    #[serde(flatten)]
    pub product: Product,
    /// Number of units, always at least one.
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// Start a new line with a single unit.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Get the product id of this line.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unrounded `price * quantity`, saturating at [`Price::MAX`].
    ///
    /// A [`CartState`] never holds a line whose total saturates.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.checked_line_total().unwrap_or(Price::MAX)
    }

    fn checked_line_total(&self) -> Option<Price> {
        self.product.price.checked_mul(self.quantity.get())
    }
}

/// Sum of line totals, or `None` if any step overflows.
fn checked_subtotal<'a>(mut lines: impl Iterator<Item = &'a CartLineItem>) -> Option<Price> {
    lines.try_fold(Price::ZERO, |acc, line| {
        acc.checked_add(line.checked_line_total()?)
    })
}

/// What adding a product did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// A new line was inserted with quantity 1.
    Added,
    /// An existing line's quantity was incremented.
    Incremented {
        /// Quantity after the increment.
        quantity: NonZeroU32,
    },
    /// The cart total would overflow; nothing changed.
    Refused,
}

/// Errors raised when a stored mapping fails shape validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartStateError {
    /// A line is stored under a key different from its product id.
    #[error("line item keyed under {key} carries product id {id}")]
    KeyMismatch {
        /// Map key the line was stored under.
        key: ProductId,
        /// Product id found inside the line.
        id: ProductId,
    },

    /// The cart total does not fit in the decimal range.
    #[error("cart total overflows")]
    TotalOverflow,
}

/// Mapping of product id to line item.
///
/// Iteration order is the key order of the underlying map: not meaningful to
/// shoppers, but stable for a given set of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ProductId, CartLineItem>",
    into = "BTreeMap<ProductId, CartLineItem>"
)]
pub struct CartState {
    lines: BTreeMap<ProductId, CartLineItem>,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
        }
    }

    /// Insert `product` with quantity 1, or increment its existing line.
    ///
    /// An existing line keeps the snapshot it was created with. If the
    /// resulting total would overflow, the cart is left unchanged.
    pub fn add(&mut self, product: &Product) -> LineChange {
        let candidate = match self.lines.get(&product.id) {
            Some(line) => CartLineItem {
                product: line.product.clone(),
                quantity: line.quantity.saturating_add(1),
            },
            None => CartLineItem::new(product.clone()),
        };
        if !self.fits(&candidate) {
            return LineChange::Refused;
        }

        let quantity = candidate.quantity;
        match self.lines.insert(product.id.clone(), candidate) {
            Some(_) => LineChange::Incremented { quantity },
            None => LineChange::Added,
        }
    }

    /// Delete the line for `id`, returning it if it existed.
    pub fn remove(&mut self, id: &ProductId) -> Option<CartLineItem> {
        self.lines.remove(id)
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// A quantity of zero or below removes the line. Setting the quantity of
    /// a line that does not exist, or to a value whose total would overflow,
    /// does nothing. Returns whether the state changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        let Some(quantity) = u32::try_from(quantity.max(0))
            .map_or(Some(NonZeroU32::MAX), NonZeroU32::new)
        else {
            return self.remove(id).is_some();
        };

        let candidate = match self.lines.get(id) {
            Some(line) if line.quantity != quantity => CartLineItem {
                product: line.product.clone(),
                quantity,
            },
            _ => return false,
        };
        if !self.fits(&candidate) {
            return false;
        }

        self.lines.insert(id.clone(), candidate);
        true
    }

    /// Whether replacing or inserting `candidate` keeps the total representable.
    fn fits(&self, candidate: &CartLineItem) -> bool {
        let others = self.lines.values().filter(|line| line.id() != candidate.id());
        checked_subtotal(others.chain(std::iter::once(candidate))).is_some()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.lines.get(id)
    }

    /// Iterate over the lines in stable key order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.values()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.quantity.get())).sum()
    }

    /// Unrounded sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        checked_subtotal(self.lines.values())
            .unwrap_or(Price::MAX)
            .amount()
    }

    /// Item count and display total.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            total: checked_subtotal(self.lines.values())
                .unwrap_or(Price::MAX)
                .rounded(),
        }
    }
}

impl TryFrom<BTreeMap<ProductId, CartLineItem>> for CartState {
    type Error = CartStateError;

    fn try_from(lines: BTreeMap<ProductId, CartLineItem>) -> Result<Self, Self::Error> {
        if let Some((key, line)) = lines.iter().find(|(key, line)| *key != line.id()) {
            return Err(CartStateError::KeyMismatch {
                key: key.clone(),
                id: line.id().clone(),
            });
        }
        if checked_subtotal(lines.values()).is_none() {
            return Err(CartStateError::TotalOverflow);
        }
        Ok(Self { lines })
    }
}

impl From<CartState> for BTreeMap<ProductId, CartLineItem> {
    fn from(state: CartState) -> Self {
        state.lines
    }
}

/// Derived summary of a cart, used for badges and change notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of all quantities.
    pub item_count: u64,
    /// Total rounded to cents.
    pub total: Price,
}

impl CartTotals {
    /// Whether the cart is empty (badge hidden, checkout disabled).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Confirmation payload captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Locally generated order reference.
    pub order_reference: Uuid,
    /// Sum of all quantities at checkout.
    pub item_count: u64,
    /// Total rounded to cents.
    pub total: Price,
    /// Lines that were checked out.
    pub lines: Vec<CartLineItem>,
    /// When the checkout happened.
    pub placed_at: DateTime<Utc>,
}

impl CheckoutSummary {
    /// Capture a summary of `state`, or `None` if the cart is empty.
    #[must_use]
    pub fn capture(state: &CartState) -> Option<Self> {
        if state.is_empty() {
            return None;
        }
        let totals = state.totals();
        Some(Self {
            order_reference: Uuid::new_v4(),
            item_count: totals.item_count,
            total: totals.total,
            lines: state.lines().cloned().collect(),
            placed_at: Utc::now(),
        })
    }
}
