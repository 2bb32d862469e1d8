//! # Domain Types
//!
//! Core domain types used throughout Stratocore Services.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │   │     Service     │   │    PricingRule      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │◄──│  category_id    │   │  service  (name)?   │   │
//! │  │  name ──────────┼───┼─────────────────┼──►│  category (name)?   │   │
//! │  │  services[]  ───┼──►│  id, name       │◄──│  discount           │   │
//! │  └─────────────────┘   │  price_cents    │   │  min_quantity?      │   │
//! │                        └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │      Order      │   read-only history         │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules reference services and categories by **name**, not id. That is how
//! the pricing datasets are authored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};

/// Numeric service identifier.
pub type ServiceId = i64;

/// Numeric category identifier.
pub type CategoryId = i64;

// =============================================================================
// Service
// =============================================================================

/// A purchasable offering with a base unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,

    /// Display name. Pricing rules target services by this name.
    pub name: String,

    pub description: String,

    /// Base unit price in cents (non-negative).
    pub price_cents: i64,

    /// Owning category. Back-filled by the catalog store on load.
    pub category_id: Option<CategoryId>,
}

impl Service {
    /// Creates a service with no owning category yet.
    pub fn new(
        id: ServiceId,
        name: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Service {
            id,
            name: name.into(),
            description: description.into(),
            price_cents,
            category_id: None,
        }
    }

    /// Returns the base unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A named, ordered grouping of services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub services: Vec<Service>,
}

// =============================================================================
// Discount
// =============================================================================

/// The kind of a pricing rule, as written in the `type` field of the
/// pricing dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountKind {
    /// `price × (1 − discount)`
    #[default]
    Percentage,

    /// `max(0, price − discount)`
    Fixed,

    /// Percentage formula, only once at least two units are in the cart.
    #[serde(alias = "bogo")]
    BuyOneGetOne,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountKind::Percentage => write!(f, "percentage"),
            DiscountKind::Fixed => write!(f, "fixed"),
            DiscountKind::BuyOneGetOne => write!(f, "buy-one-get-one"),
        }
    }
}

impl std::str::FromStr for DiscountKind {
    type Err = String;

    /// Accepts the dataset spellings, including the short `bogo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(DiscountKind::Percentage),
            "fixed" => Ok(DiscountKind::Fixed),
            "bogo" | "buy-one-get-one" => Ok(DiscountKind::BuyOneGetOne),
            other => Err(format!("unknown discount type '{}'", other)),
        }
    }
}

/// A discount kind together with its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "amount", rename_all = "kebab-case")]
pub enum Discount {
    Percentage(DiscountRate),
    Fixed(Money),
    BuyOneGetOne(DiscountRate),
}

impl Discount {
    /// Percentage discount in basis points (1000 = 10%).
    pub const fn percentage(bps: u32) -> Self {
        Discount::Percentage(DiscountRate::from_bps(bps))
    }

    /// Fixed amount off, in cents.
    pub const fn fixed(cents: i64) -> Self {
        Discount::Fixed(Money::from_cents(cents))
    }

    /// Buy-one-get-one with its percentage in basis points.
    pub const fn buy_one_get_one(bps: u32) -> Self {
        Discount::BuyOneGetOne(DiscountRate::from_bps(bps))
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Percentage(_) => DiscountKind::Percentage,
            Discount::Fixed(_) => DiscountKind::Fixed,
            Discount::BuyOneGetOne(_) => DiscountKind::BuyOneGetOne,
        }
    }
}

// =============================================================================
// Pricing Rule
// =============================================================================

/// A declarative discount for a named service or a named category.
///
/// ## Targets
/// Exactly one of `service` / `category` is expected to be set:
/// - neither set: the rule matches nothing
/// - both set: the rule is matched through the service name when the
///   service path is taken; the category name only matters for services
///   that have no service-specific rules at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub service: Option<String>,
    pub category: Option<String>,
    pub discount: Discount,

    /// Below this quantity the rule does not fire.
    pub min_quantity: Option<i64>,
}

impl PricingRule {
    pub fn for_service(name: impl Into<String>, discount: Discount) -> Self {
        PricingRule {
            service: Some(name.into()),
            category: None,
            discount,
            min_quantity: None,
        }
    }

    pub fn for_category(name: impl Into<String>, discount: Discount) -> Self {
        PricingRule {
            service: None,
            category: Some(name.into()),
            discount,
            min_quantity: None,
        }
    }

    /// Sets the minimum quantity threshold.
    pub fn with_min_quantity(mut self, min_quantity: i64) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    /// True when the rule targets neither a service nor a category.
    pub fn is_inert(&self) -> bool {
        self.service.is_none() && self.category.is_none()
    }

    /// True when `quantity` meets the rule's threshold (if any).
    pub fn accepts_quantity(&self, quantity: i64) -> bool {
        match self.min_quantity {
            Some(min) => quantity >= min,
            None => true,
        }
    }
}

// =============================================================================
// Users & Order History
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// One `(service, quantity)` line of a historical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub service_id: ServiceId,
    pub quantity: i64,
}

/// A historical order (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: i64,

    /// Order date as recorded in the history dataset.
    pub date: String,

    pub services: Vec<OrderLine>,

    /// Total as recorded at order time, if the dataset carries one.
    pub total_cents: Option<i64>,
}

impl Order {
    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.services.iter().map(|line| line.quantity).sum()
    }

    #[inline]
    pub fn total(&self) -> Option<Money> {
        self.total_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_kind_from_str() {
        assert_eq!("percentage".parse::<DiscountKind>(), Ok(DiscountKind::Percentage));
        assert_eq!("Fixed".parse::<DiscountKind>(), Ok(DiscountKind::Fixed));
        assert_eq!("bogo".parse::<DiscountKind>(), Ok(DiscountKind::BuyOneGetOne));
        assert_eq!(
            "buy-one-get-one".parse::<DiscountKind>(),
            Ok(DiscountKind::BuyOneGetOne)
        );
        assert!("tiered".parse::<DiscountKind>().is_err());
    }

    #[test]
    fn test_discount_kind_default_is_percentage() {
        assert_eq!(DiscountKind::default(), DiscountKind::Percentage);
    }

    #[test]
    fn test_discount_kind_accepts_bogo_alias() {
        let kind: DiscountKind = serde_json::from_str("\"bogo\"").unwrap();
        assert_eq!(kind, DiscountKind::BuyOneGetOne);

        let kind: DiscountKind = serde_json::from_str("\"buy-one-get-one\"").unwrap();
        assert_eq!(kind, DiscountKind::BuyOneGetOne);
        assert_eq!(kind.to_string(), "buy-one-get-one");
    }

    #[test]
    fn test_discount_kind_of_discount() {
        assert_eq!(Discount::percentage(1000).kind(), DiscountKind::Percentage);
        assert_eq!(Discount::fixed(500).kind(), DiscountKind::Fixed);
        assert_eq!(Discount::buy_one_get_one(5000).kind(), DiscountKind::BuyOneGetOne);
    }

    #[test]
    fn test_rule_threshold() {
        let rule = PricingRule::for_service("Backup", Discount::fixed(500)).with_min_quantity(3);
        assert!(!rule.accepts_quantity(2));
        assert!(rule.accepts_quantity(3));
        assert!(rule.accepts_quantity(10));

        let open = PricingRule::for_service("Backup", Discount::fixed(500));
        assert!(open.accepts_quantity(1));
    }

    #[test]
    fn test_inert_rule() {
        let mut rule = PricingRule::for_service("Backup", Discount::percentage(1000));
        assert!(!rule.is_inert());
        rule.service = None;
        assert!(rule.is_inert());
    }

    #[test]
    fn test_order_totals() {
        let order = Order {
            order_id: "ORD-001".to_string(),
            user_id: 1,
            date: "2024-01-15".to_string(),
            services: vec![
                OrderLine { service_id: 1, quantity: 2 },
                OrderLine { service_id: 4, quantity: 1 },
            ],
            total_cents: Some(12_500),
        };
        assert_eq!(order.total_quantity(), 3);
        assert_eq!(order.total(), Some(Money::from_cents(12_500)));
    }
}
