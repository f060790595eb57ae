//! In-memory shopping cart store.
//!
//! The cart is the single authoritative copy of what the customer intends to
//! buy. It is an explicitly constructed store handle - created once at
//! application startup, passed to whatever needs it, never a global - and it
//! lives only in process memory: nothing is persisted across restarts.
//!
//! Every mutation recomputes the subtotal and item count from the line list.
//! There is no incremental accounting to drift out of sync with the lines;
//! the line list is the only source of truth.
//!
//! All transitions are total: no precondition can make one fail. Each holds
//! the inner lock for the whole transition, so transitions apply atomically
//! in call order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use velora_core::{Price, ProductId};

use crate::catalog::Product;

/// One product's entry in the cart.
///
/// Name, price, images, and category are snapshotted from the product at add
/// time; later catalog changes do not rewrite existing lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_refs: Vec<String>,
    pub category: String,
    /// Always at least 1; a would-be zero-quantity line is removed instead.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line (`unit_price` times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image_refs: product.image_refs(),
            category: product.category.clone(),
            quantity,
        }
    }
}

/// Derived view of the cart, recomputed on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Sum of `unit_price` times quantity over all lines.
    pub subtotal: Price,
    /// Sum of quantities over all lines (not the number of lines).
    pub line_item_count: u32,
    /// Whether the cart drawer is shown. Independent of line contents.
    pub is_visible: bool,
}

impl CartSnapshot {
    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct CartState {
    lines: Vec<CartLine>,
    subtotal: Price,
    line_item_count: u32,
    is_visible: bool,
}

impl CartState {
    const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Price::ZERO,
            line_item_count: 0,
            is_visible: false,
        }
    }

    /// Rederive the totals from the line list.
    fn recompute(&mut self) {
        self.subtotal = self.lines.iter().map(CartLine::line_total).sum();
        self.line_item_count = self.lines.iter().map(|line| line.quantity).sum();
    }

    fn merge_or_append(&mut self, product: &Product, quantity: u32) {
        // A zero add still means the customer wants the item.
        let quantity = quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine::from_product(product, quantity));
        }
        self.recompute();
    }
}

/// The shopping cart store.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Mutex<CartState>>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CartState::empty())),
        }
    }

    /// Add `quantity` of a product, merging into an existing line for the
    /// same product id. Opens the cart drawer.
    pub fn add(&self, product: &Product, quantity: u32) {
        let mut state = self.state();
        state.merge_or_append(product, quantity);
        state.is_visible = true;
    }

    /// Add `quantity` of a product without touching drawer visibility.
    ///
    /// Used by buy-now flows that redirect straight to checkout instead of
    /// popping the cart open.
    pub fn add_silent(&self, product: &Product, quantity: u32) {
        self.state().merge_or_append(product, quantity);
    }

    /// Remove the line for a product id. No-op when absent.
    pub fn remove(&self, id: &ProductId) {
        let mut state = self.state();
        state.lines.retain(|line| &line.id != id);
        state.recompute();
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// A quantity of zero removes the line; the cart never holds a
    /// zero-quantity line.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }

        let mut state = self.state();
        if let Some(line) = state.lines.iter_mut().find(|line| &line.id == id) {
            line.quantity = quantity;
        }
        state.recompute();
    }

    /// Empty the cart. Drawer visibility is left as it was.
    pub fn clear(&self) {
        let mut state = self.state();
        state.lines.clear();
        state.recompute();
    }

    /// Flip drawer visibility.
    pub fn toggle(&self) {
        let mut state = self.state();
        state.is_visible = !state.is_visible;
    }

    /// Show the cart drawer.
    pub fn open(&self) {
        self.state().is_visible = true;
    }

    /// Hide the cart drawer.
    pub fn close(&self) {
        self.state().is_visible = false;
    }

    /// The current derived view of the cart.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.state();
        CartSnapshot {
            lines: state.lines.clone(),
            subtotal: state.subtotal,
            line_item_count: state.line_item_count,
            is_visible: state.is_visible,
        }
    }

    /// Total item count, for the header badge.
    #[must_use]
    pub fn line_item_count(&self) -> u32 {
        self.state().line_item_count
    }

    /// Current subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state().subtotal
    }

    fn state(&self) -> MutexGuard<'_, CartState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
