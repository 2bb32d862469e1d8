//! # Wire Records
//!
//! The JSON shapes of the datasets, and their conversion into domain types.
//!
//! ```text
//! services.json    { "categories": [ { id, name, services: [ { id, name, description, price } ] } ] }
//! pricerules.json  { "rules": [ { service?, category?, discount, type?, minQuantity? } ] }
//! user.json        { "users": [ { id, username, email } ] }
//! orders.json      { "orderHistory": [ { orderId, userId, date, services: [ { serviceId, quantity } ], totalAmount? } ] }
//! ```
//!
//! Prices and fixed discounts are decimal currency units on the wire and are
//! converted to cents here. Percentage discounts are fractions (`0.1` = 10%)
//! and are converted to basis points.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use strato_core::{
    Category, Discount, DiscountKind, DiscountRate, Money, Order, OrderLine, PricingRule,
    Service, User,
};

use crate::error::{LoadError, LoadResult};
use crate::source::Resource;

/// Converts a decimal amount (`19.99`) to cents (`1999`), rounding to the
/// nearest cent.
pub fn cents_from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn parse<T: DeserializeOwned>(resource: Resource, bytes: &[u8]) -> LoadResult<T> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::Parse { resource, source })
}

// =============================================================================
// services.json
// =============================================================================

#[derive(Debug, Deserialize)]
struct ServicesFile {
    categories: Vec<CategoryRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: i64,
    name: String,
    #[serde(default)]
    services: Vec<ServiceRecord>,
}

#[derive(Debug, Deserialize)]
struct ServiceRecord {
    id: i64,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category {
            id: record.id,
            name: record.name,
            services: record
                .services
                .into_iter()
                .map(|s| Service::new(s.id, s.name, s.description, cents_from_decimal(s.price)))
                .collect(),
        }
    }
}

/// Decodes `services.json`. Category references on services are back-filled
/// later by the catalog store.
pub fn decode_categories(bytes: &[u8]) -> LoadResult<Vec<Category>> {
    let file: ServicesFile = parse(Resource::Services, bytes)?;
    Ok(file.categories.into_iter().map(Category::from).collect())
}

// =============================================================================
// pricerules.json
// =============================================================================

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: Vec<RuleRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleRecord {
    service: Option<String>,
    category: Option<String>,
    discount: f64,
    #[serde(rename = "type")]
    kind: Option<String>,
    min_quantity: Option<i64>,
}

impl RuleRecord {
    /// Missing and unrecognized types both read as `percentage`.
    fn discount_kind(&self) -> DiscountKind {
        match self.kind.as_deref() {
            None => DiscountKind::Percentage,
            Some(raw) => raw.parse().unwrap_or_else(|reason: String| {
                warn!(
                    service = ?self.service,
                    category = ?self.category,
                    "{}, treating rule as percentage",
                    reason
                );
                DiscountKind::Percentage
            }),
        }
    }

    /// Percentage-style rates below zero are floored at zero.
    fn rate(&self) -> DiscountRate {
        if self.discount < 0.0 {
            warn!(
                service = ?self.service,
                category = ?self.category,
                discount = self.discount,
                "Negative discount rate, treating it as 0"
            );
        }
        DiscountRate::from_fraction(self.discount)
    }

    fn into_rule(self) -> PricingRule {
        let discount = match self.discount_kind() {
            DiscountKind::Percentage => Discount::Percentage(self.rate()),
            DiscountKind::Fixed => Discount::Fixed(Money::from_cents(cents_from_decimal(self.discount))),
            DiscountKind::BuyOneGetOne => Discount::BuyOneGetOne(self.rate()),
        };

        PricingRule {
            service: self.service,
            category: self.category,
            discount,
            min_quantity: self.min_quantity,
        }
    }
}

/// Decodes `pricerules.json`, keeping the stored rule order.
pub fn decode_rules(bytes: &[u8]) -> LoadResult<Vec<PricingRule>> {
    let file: RulesFile = parse(Resource::PriceRules, bytes)?;

    let defaulted = file.rules.iter().filter(|rule| rule.kind.is_none()).count();
    if defaulted > 0 {
        debug!(count = defaulted, "Rules without a type default to percentage");
    }

    let rules: Vec<PricingRule> = file.rules.into_iter().map(RuleRecord::into_rule).collect();

    let inert = rules.iter().filter(|rule| rule.is_inert()).count();
    if inert > 0 {
        warn!(count = inert, "Rules without a service or category never apply");
    }

    Ok(rules)
}

// =============================================================================
// user.json
// =============================================================================

#[derive(Debug, Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

pub fn decode_users(bytes: &[u8]) -> LoadResult<Vec<User>> {
    let file: UsersFile = parse(Resource::Users, bytes)?;
    Ok(file.users)
}

// =============================================================================
// orders.json
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersFile {
    order_history: Vec<OrderRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    order_id: String,
    user_id: i64,
    date: String,
    services: Vec<OrderLine>,
    total_amount: Option<f64>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Order {
            order_id: record.order_id,
            user_id: record.user_id,
            date: record.date,
            services: record.services,
            total_cents: record.total_amount.map(cents_from_decimal),
        }
    }
}

pub fn decode_orders(bytes: &[u8]) -> LoadResult<Vec<Order>> {
    let file: OrdersFile = parse(Resource::Orders, bytes)?;
    Ok(file.order_history.into_iter().map(Order::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_core::{resolve_price, CatalogStore};

    #[test]
    fn test_cents_from_decimal() {
        assert_eq!(cents_from_decimal(50.0), 5000);
        assert_eq!(cents_from_decimal(19.99), 1999);
        assert_eq!(cents_from_decimal(0.1 + 0.2), 30);
        assert_eq!(cents_from_decimal(0.0), 0);
    }

    #[test]
    fn test_decode_categories() {
        let json = br#"{
            "categories": [
                {
                    "id": 1,
                    "name": "Cloud",
                    "services": [
                        { "id": 10, "name": "Backup", "description": "Nightly backups", "price": 49.99 },
                        { "id": 11, "name": "Storage", "description": "Object storage", "price": 20 }
                    ]
                },
                { "id": 2, "name": "Empty", "services": [] }
            ]
        }"#;

        let categories = decode_categories(json).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].services[0].price_cents, 4999);
        assert_eq!(categories[0].services[1].price_cents, 2000);
        assert!(categories[1].services.is_empty());
    }

    #[test]
    fn test_decode_rules_normalizes_type() {
        let json = br#"{
            "rules": [
                { "service": "Backup", "discount": 0.1 },
                { "service": "Backup", "discount": 5, "type": "fixed", "minQuantity": 3 },
                { "category": "Support", "discount": 0.5, "type": "bogo" },
                { "category": "Cloud", "discount": 0.15, "type": "tiered" }
            ]
        }"#;

        let rules = decode_rules(json).unwrap();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0], PricingRule::for_service("Backup", Discount::percentage(1000)));
        assert_eq!(
            rules[1],
            PricingRule::for_service("Backup", Discount::fixed(500)).with_min_quantity(3)
        );
        assert_eq!(
            rules[2],
            PricingRule::for_category("Support", Discount::buy_one_get_one(5000))
        );
        assert_eq!(rules[3].discount, Discount::percentage(1500));
    }

    #[test]
    fn test_decode_rules_keeps_sub_basis_point_precision() {
        let rules = decode_rules(br#"{ "rules": [ { "service": "Audit", "discount": 0.12345 } ] }"#)
            .unwrap();

        let mut catalog = CatalogStore::new();
        catalog.replace_categories(vec![Category {
            id: 1,
            name: "Security".to_string(),
            services: vec![Service::new(5, "Audit", "Annual audit", 100_000)],
        }]);
        catalog.replace_rules(rules);

        let audit = catalog.service_by_id(5).unwrap();
        assert_eq!(resolve_price(&catalog, &audit, 1).unit_price.cents(), 87_655);
    }

    #[test]
    fn test_decode_rules_floors_negative_rate() {
        let rules = decode_rules(
            br#"{ "rules": [
                { "service": "Backup", "discount": -0.2 },
                { "category": "Cloud", "discount": -0.5, "type": "bogo" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(rules[0].discount, Discount::percentage(0));
        assert_eq!(rules[1].discount, Discount::buy_one_get_one(0));
    }

    #[test]
    fn test_decode_rules_keeps_inert_rules() {
        let rules = decode_rules(br#"{ "rules": [ { "discount": 0.1 } ] }"#).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(rules[0].is_inert());
    }

    #[test]
    fn test_decode_rules_rejects_wrong_shape() {
        let err = decode_rules(br#"[{ "service": "Backup", "discount": 0.1 }]"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse { resource: Resource::PriceRules, .. }));
    }

    #[test]
    fn test_decode_users() {
        let json = br#"{ "users": [ { "id": 1, "username": "ada", "email": "ada@example.com" } ] }"#;
        let users = decode_users(json).unwrap();
        assert_eq!(users[0].username, "ada");
    }

    #[test]
    fn test_decode_orders() {
        let json = br#"{
            "orderHistory": [
                {
                    "orderId": "ORD-001",
                    "userId": 1,
                    "date": "2024-03-01",
                    "services": [ { "serviceId": 10, "quantity": 2 } ],
                    "totalAmount": 89.98
                },
                {
                    "orderId": "ORD-002",
                    "userId": 2,
                    "date": "2024-03-04",
                    "services": []
                }
            ]
        }"#;

        let orders = decode_orders(json).unwrap();
        assert_eq!(orders[0].total_cents, Some(8998));
        assert_eq!(orders[0].total_quantity(), 2);
        assert_eq!(orders[1].total_cents, None);
    }
}
