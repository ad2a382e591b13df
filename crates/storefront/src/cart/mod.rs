//! Cart store.
//!
//! [`CartStore`] owns the [`CartState`] for the session. Every mutation runs
//! to completion in three steps: update the in-memory state, write it through
//! [`CartPersistence`], then publish a [`CartChanged`] notification. A
//! subscriber reacting to the notification therefore always sees the state
//! that was persisted.
//!
//! Persistence failures are logged and swallowed; the in-memory state stays
//! authoritative for the rest of the session.

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use shopfront_core::{
    CartLineItem, CartState, CartTotals, CheckoutSummary, LineChange, Price, ProductId,
};

use crate::catalog::ProductLookup;
use crate::persistence::{CartPersistence, KeyValueStore};

/// Notification published after every cart mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartChanged {
    /// Sum of all quantities.
    pub item_count: u64,
    /// Total rounded to cents.
    pub total: Price,
    /// Number of mutations published so far.
    pub revision: u64,
}

impl CartChanged {
    /// Whether the cart is empty (badge hidden, checkout disabled).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Result of [`CartStore::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with quantity 1.
    Added,
    /// An existing line was incremented.
    Incremented {
        /// Quantity after the increment.
        quantity: u32,
    },
    /// The id is not in the catalog; nothing changed.
    UnknownProduct,
    /// The cart total would overflow; nothing changed.
    Refused,
}

impl AddOutcome {
    /// Whether the cart gained a unit, either as a new line or an increment.
    #[must_use]
    pub const fn changed_cart(&self) -> bool {
        matches!(self, Self::Added | Self::Incremented { .. })
    }
}

/// Session-scoped cart with write-through persistence.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    persistence: CartPersistence<S>,
    changes: watch::Sender<CartChanged>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store hydrated from `persistence`.
    ///
    /// Unreadable stored data yields an empty cart.
    #[must_use]
    pub fn hydrate(persistence: CartPersistence<S>) -> Self {
        let state = persistence.load();
        let totals = state.totals();
        info!(
            lines = state.len(),
            item_count = totals.item_count,
            "Cart hydrated"
        );

        let (changes, _) = watch::channel(CartChanged {
            item_count: totals.item_count,
            total: totals.total,
            revision: 0,
        });

        Self {
            state,
            persistence,
            changes,
        }
    }

    /// Subscribe to change notifications.
    ///
    /// The receiver starts at the latest published value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartChanged> {
        self.changes.subscribe()
    }

    /// Add one unit of `id`.
    ///
    /// The product must resolve through `catalog`; unknown ids, and adds
    /// that would overflow the cart total, are ignored without persisting or
    /// notifying.
    pub fn add_item(&mut self, catalog: &impl ProductLookup, id: &ProductId) -> AddOutcome {
        let Some(product) = catalog.find_by_id(id) else {
            debug!(product_id = %id, "Ignoring add of unknown product");
            return AddOutcome::UnknownProduct;
        };

        let outcome = match self.state.add(product) {
            LineChange::Added => AddOutcome::Added,
            LineChange::Incremented { quantity } => AddOutcome::Incremented {
                quantity: quantity.get(),
            },
            LineChange::Refused => {
                warn!(product_id = %id, "Refusing add that would overflow the cart total");
                return AddOutcome::Refused;
            }
        };
        debug!(product_id = %id, ?outcome, "Added to cart");
        self.commit();
        outcome
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let removed = self.state.remove(id).is_some();
        debug!(product_id = %id, removed, "Remove from cart");
        self.commit();
        removed
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// Zero or below removes the line; an absent line is left absent, and a
    /// quantity whose total would overflow leaves the line unchanged.
    /// Returns whether the state changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        let changed = self.state.set_quantity(id, quantity);
        debug!(product_id = %id, quantity, changed, "Set cart quantity");
        self.commit();
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.state.clear();
        debug!("Cart cleared");
        self.commit();
    }

    /// Capture a confirmation summary and clear the cart.
    ///
    /// Returns `None` without touching anything when the cart is empty.
    pub fn checkout(&mut self) -> Option<CheckoutSummary> {
        let summary = CheckoutSummary::capture(&self.state)?;
        info!(
            order_reference = %summary.order_reference,
            item_count = summary.item_count,
            total = %summary.total,
            "Checkout complete"
        );
        self.clear();
        Some(summary)
    }

    /// Current line items in stable order.
    #[must_use]
    pub fn items(&self) -> Vec<&CartLineItem> {
        self.state.lines().collect()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Total rounded to cents, for display.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.totals().total
    }

    /// Unrounded total, for further arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.state.subtotal()
    }

    /// Item count and display total together.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.state.totals()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Read-only view of the state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Persist, then notify.
    fn commit(&self) {
        if let Err(e) = self.persistence.save(&self.state) {
            warn!(error = %e, "Cart not persisted; keeping in-memory state");
        }

        let totals = self.state.totals();
        self.changes.send_modify(|changed| {
            changed.item_count = totals.item_count;
            changed.total = totals.total;
            changed.revision += 1;
        });
    }
}
