//! # Pricing Rule Engine
//!
//! Decides which pricing rules apply to a `(service, quantity)` pair and what
//! unit price results.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_price(catalog, service, quantity)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rules_for_service(service.name) ── non-empty? ──► candidates (only)    │
//! │       │ empty                                                           │
//! │       ▼                                                                 │
//! │  category_by_id(service.category_id)                                   │
//! │       ├── found ──► rules_for_category(category.name) ──► candidates    │
//! │       └── none  ──► no candidates                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for rule in candidates (stored order):                                 │
//! │       quantity < min_quantity? ──► skip                                 │
//! │       else fire: applied.push(rule)                                     │
//! │                  price = apply(rule, BASE price)   ◄── overwrite,       │
//! │                                                        never stack      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  (price rounded to the cent, applied rules)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! All arithmetic is in integer cents. Percentage discounts round half up
//! (half away from zero) to the cent; fixed discounts are exact.

use serde::Serialize;
use tracing::trace;

use crate::catalog::CatalogStore;
use crate::money::Money;
use crate::types::{Discount, PricingRule, Service};

/// Outcome of a price resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResolution {
    /// Discounted unit price. Equals the base price when nothing fired.
    pub unit_price: Money,

    /// Rules that fired, in stored order.
    pub applied_rules: Vec<PricingRule>,
}

/// Resolves the unit price of `service` at `quantity`.
///
/// Service-specific rules are exclusive: as soon as one exists for the
/// service name, category rules are not considered, even when none of the
/// service rules meets its quantity threshold.
///
/// ## Example
/// ```rust
/// use strato_core::{CatalogStore, Category, Discount, PricingRule, Service};
/// use strato_core::pricing::resolve_price;
///
/// let mut catalog = CatalogStore::new();
/// catalog.replace_categories(vec![Category {
///     id: 1,
///     name: "Cloud".to_string(),
///     services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
/// }]);
/// catalog.replace_rules(vec![
///     PricingRule::for_service("Backup", Discount::percentage(1000)),
///     PricingRule::for_service("Backup", Discount::fixed(500)).with_min_quantity(3),
/// ]);
///
/// let backup = catalog.service_by_id(10).unwrap();
///
/// let single = resolve_price(&catalog, &backup, 1);
/// assert_eq!(single.unit_price.cents(), 4500);
/// assert_eq!(single.applied_rules.len(), 1);
///
/// let bulk = resolve_price(&catalog, &backup, 3);
/// assert_eq!(bulk.unit_price.cents(), 4500);
/// assert_eq!(bulk.applied_rules.len(), 2);
/// ```
pub fn resolve_price(catalog: &CatalogStore, service: &Service, quantity: i64) -> PriceResolution {
    let base = service.price();
    let mut unit_price = base;
    let mut applied_rules = Vec::new();

    for rule in candidate_rules(catalog, service) {
        if !rule.accepts_quantity(quantity) {
            trace!(service = %service.name, quantity, min = ?rule.min_quantity, "Rule below threshold");
            continue;
        }

        trace!(service = %service.name, kind = %rule.discount.kind(), "Rule fired");
        applied_rules.push(rule.clone());
        if let Some(price) = apply_discount(base, &rule.discount, quantity) {
            unit_price = price;
        }
    }

    trace!(
        service = %service.name,
        quantity,
        base = %base,
        unit_price = %unit_price,
        fired = applied_rules.len(),
        "Price resolved"
    );

    PriceResolution {
        unit_price,
        applied_rules,
    }
}

/// Service rules if any exist, otherwise the owning category's rules.
fn candidate_rules<'a>(catalog: &'a CatalogStore, service: &Service) -> Vec<&'a PricingRule> {
    let service_rules = catalog.rules_for_service(&service.name);
    if !service_rules.is_empty() {
        return service_rules;
    }

    service
        .category_id
        .and_then(|id| catalog.category_by_id(id))
        .map(|category| catalog.rules_for_category(&category.name))
        .unwrap_or_default()
}

/// Price of one unit after `discount`, computed from the base price.
///
/// `None` means the discount has no price effect at this quantity.
fn apply_discount(base: Money, discount: &Discount, quantity: i64) -> Option<Money> {
    match discount {
        Discount::Percentage(rate) => Some(base.apply_percentage_discount(*rate)),
        Discount::Fixed(amount) => Some(base.saturating_discount(*amount)),
        // Not per-unit BOGO: the percentage formula once two units are in.
        Discount::BuyOneGetOne(rate) if quantity >= 2 => {
            Some(base.apply_percentage_discount(*rate))
        }
        Discount::BuyOneGetOne(_) => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
