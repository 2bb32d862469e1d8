//! # Cart Ledger
//!
//! Holds the cart lines, re-prices a line through the pricing engine on every
//! mutation, and derives totals from the current lines.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Ledger Operations                             │
//! │                                                                         │
//! │  add_item(svc, n) ── line exists? ──yes──► update_quantity(id, old + n) │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  resolve_price(svc, n) ──► push CartLine                                │
//! │                                                                         │
//! │  update_quantity(id, n) ── n <= 0? ──yes──► remove_item(id)             │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  line.quantity = n ──► resolve_price ──► overwrite cached discount      │
//! │                                                                         │
//! │  recalculate_all_prices() ──► resolve_price for every line              │
//! │                                (rules arrived after items were added)   │
//! │                                                                         │
//! │  totals() ──► pure reduction over lines, never stored                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per service id
//! - Line quantity is always > 0 (a line at zero is removed)
//! - `discounted_price` is `None` whenever it would equal the original price

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::catalog::CatalogStore;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{resolve_price, PriceResolution};
use crate::types::{PricingRule, Service, ServiceId};
use crate::validation::validate_cart_size;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One service-quantity-price record of the cart.
///
/// The discount fields are a cache of the last pricing resolution, refreshed
/// by the ledger on every quantity change or recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[ts(as = "Service")]
    pub service: Arc<Service>,

    pub quantity: i64,

    /// Service unit price captured when the line was created.
    pub original_price: Money,

    /// Discounted unit price; `None` when no rule changed the price.
    pub discounted_price: Option<Money>,

    /// Rules behind `discounted_price`, empty when none fired.
    pub applied_rules: Vec<PricingRule>,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn new(service: Arc<Service>, quantity: i64, resolution: PriceResolution) -> Self {
        let mut line = CartLine {
            original_price: service.price(),
            service,
            quantity,
            discounted_price: None,
            applied_rules: Vec::new(),
            added_at: Utc::now(),
        };
        line.apply(resolution);
        line
    }

    /// Overwrites the cached discount with a fresh resolution.
    fn apply(&mut self, resolution: PriceResolution) {
        self.discounted_price =
            (resolution.unit_price != self.original_price).then_some(resolution.unit_price);
        self.applied_rules = resolution.applied_rules;
    }

    /// Unit price actually charged.
    pub fn effective_unit_price(&self) -> Money {
        self.discounted_price.unwrap_or(self.original_price)
    }

    /// Original unit price × quantity.
    pub fn original_total(&self) -> Money {
        self.original_price.multiply_quantity(self.quantity)
    }

    /// Effective unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.effective_unit_price().multiply_quantity(self.quantity)
    }

    pub fn savings(&self) -> Money {
        self.original_total() - self.line_total()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Usage
/// ```rust
/// use strato_core::{Cart, CatalogStore, Category, Discount, PricingRule, Service};
///
/// let mut catalog = CatalogStore::new();
/// catalog.replace_categories(vec![Category {
///     id: 1,
///     name: "Cloud".to_string(),
///     services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
/// }]);
/// catalog.replace_rules(vec![PricingRule::for_category("Cloud", Discount::percentage(1000))]);
///
/// let backup = catalog.service_by_id(10).unwrap();
/// let mut cart = Cart::new();
/// cart.add_item(&catalog, backup.clone(), 2).unwrap();
/// cart.add_item(&catalog, backup, 3).unwrap();
///
/// assert_eq!(cart.line_count(), 1);
/// assert_eq!(cart.items_count(), 5);
/// assert_eq!(cart.total_savings().cents(), 2500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` units of `service`.
    ///
    /// ## Behavior
    /// - Service already in cart: delegates to `update_quantity` with the sum
    /// - Otherwise: prices the line once and appends it
    /// - A non-positive quantity never creates a line
    ///
    /// ## Errors
    /// `QuantityTooLarge` / `CartTooLarge` when a guard rail would be
    /// crossed. The cart is unchanged in that case.
    pub fn add_item(
        &mut self,
        catalog: &CatalogStore,
        service: Arc<Service>,
        quantity: i64,
    ) -> CoreResult<()> {
        if let Some(existing) = self.get_item_by_service_id(service.id) {
            let summed = existing.quantity.saturating_add(quantity);
            return self.update_quantity(catalog, service.id, summed);
        }

        if quantity <= 0 {
            debug!(service_id = service.id, quantity, "Ignoring add of non-positive quantity");
            return Ok(());
        }
        check_quantity(quantity)?;
        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        })?;

        let resolution = resolve_price(catalog, &service, quantity);
        let line = CartLine::new(service, quantity, resolution);
        debug!(
            service_id = line.service.id,
            quantity,
            discounted = line.discounted_price.is_some(),
            "Cart line added"
        );
        self.lines.push(line);
        Ok(())
    }

    /// Sets the quantity of a line and re-prices it.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line
    /// - Service not in cart: nothing happens
    pub fn update_quantity(
        &mut self,
        catalog: &CatalogStore,
        service_id: ServiceId,
        quantity: i64,
    ) -> CoreResult<()> {
        let Some(index) = self.position(service_id) else {
            debug!(service_id, "Update for service not in cart");
            return Ok(());
        };

        if quantity <= 0 {
            self.lines.remove(index);
            debug!(service_id, "Cart line removed by zero quantity");
            return Ok(());
        }
        check_quantity(quantity)?;

        let line = &mut self.lines[index];
        line.quantity = quantity;
        let resolution = resolve_price(catalog, &line.service, quantity);
        line.apply(resolution);

        debug!(service_id, quantity, "Cart line quantity updated");
        Ok(())
    }

    /// Adds one unit to an existing line.
    pub fn increase_quantity(&mut self, catalog: &CatalogStore, service_id: ServiceId) -> CoreResult<()> {
        match self.get_item_by_service_id(service_id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(1);
                self.update_quantity(catalog, service_id, quantity)
            }
            None => Ok(()),
        }
    }

    /// Removes one unit from an existing line; the line goes away at zero.
    pub fn decrease_quantity(&mut self, catalog: &CatalogStore, service_id: ServiceId) -> CoreResult<()> {
        match self.get_item_by_service_id(service_id) {
            Some(line) => {
                let quantity = line.quantity.saturating_sub(1);
                self.update_quantity(catalog, service_id, quantity)
            }
            None => Ok(()),
        }
    }

    /// Removes a line, returning it if it was present.
    pub fn remove_item(&mut self, service_id: ServiceId) -> Option<CartLine> {
        let index = self.position(service_id)?;
        debug!(service_id, "Cart line removed");
        Some(self.lines.remove(index))
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
        debug!("Cart cleared");
    }

    /// Re-prices every line against the current rules.
    ///
    /// Needed whenever the rule set changes after items were added. Linear in
    /// the number of lines.
    pub fn recalculate_all_prices(&mut self, catalog: &CatalogStore) {
        for line in &mut self.lines {
            let resolution = resolve_price(catalog, &line.service, line.quantity);
            line.apply(resolution);
        }
        debug!(lines = self.lines.len(), "Cart prices recalculated");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get_item_by_service_id(&self, service_id: ServiceId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.service.id == service_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    pub fn items_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn total_original_price(&self) -> Money {
        self.lines.iter().map(CartLine::original_total).sum()
    }

    pub fn total_discounted_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn total_savings(&self) -> Money {
        self.total_original_price() - self.total_discounted_price()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn position(&self, service_id: ServiceId) -> Option<usize> {
        self.lines.iter().position(|line| line.service.id == service_id)
    }
}

fn check_quantity(quantity: i64) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate totals snapshot, derived from the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub items_count: i64,
    pub total_original_price: Money,
    pub total_discounted_price: Money,
    pub total_savings: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let total_original_price = cart.total_original_price();
        let total_discounted_price = cart.total_discounted_price();
        CartTotals {
            line_count: cart.line_count(),
            items_count: cart.items_count(),
            total_original_price,
            total_discounted_price,
            total_savings: total_original_price - total_discounted_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
