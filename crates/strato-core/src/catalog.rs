//! # Catalog Store
//!
//! Holds the categories, services and pricing rules loaded from the data
//! endpoints, and answers lookups against them.
//!
//! ## Load State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Per-dataset load state                                 │
//! │                                                                         │
//! │   NotLoaded ──replace_*()──► Loaded ◄──replace_*()── Failed(msg)        │
//! │       │                        │                        ▲               │
//! │       └────record_failure()────┼────────────────────────┘               │
//! │                                │                                        │
//! │                   record_failure() keeps Loaded:                        │
//! │                   previous data stays usable, message is surfaced       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries never fail. An unknown id or name yields an empty or absent result,
//! which the pricing engine reads as "no discount". The store can be queried
//! before anything is loaded; it is simply empty.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::types::{Category, CategoryId, PricingRule, Service, ServiceId};

/// The two datasets a catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Categories,
    Rules,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Categories => write!(f, "categories"),
            Dataset::Rules => write!(f, "price rules"),
        }
    }
}

/// Whether a dataset has been populated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    /// The last attempt failed and nothing was ever loaded.
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// In-memory catalog with explicit ownership.
///
/// ## Usage
/// ```rust
/// use strato_core::{CatalogStore, Category, Service};
///
/// let mut store = CatalogStore::new();
/// assert!(store.service_by_id(1).is_none());
///
/// store.replace_categories(vec![Category {
///     id: 7,
///     name: "Support".to_string(),
///     services: vec![Service::new(1, "Hotline", "24/7 phone support", 9900)],
/// }]);
///
/// // category reference is back-filled from the enclosing category
/// assert_eq!(store.service_by_id(1).unwrap().category_id, Some(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    categories: Vec<Category>,
    services: Vec<Arc<Service>>,
    rules: Vec<PricingRule>,
    categories_state: LoadState,
    rules_state: LoadState,
    last_error: Option<String>,
}

impl CatalogStore {
    /// Creates an empty, not-yet-loaded store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Population
    // =========================================================================

    /// Replaces all categories and services.
    ///
    /// Every service gets its `category_id` set to the id of the category it
    /// is nested in, and the flat service index is rebuilt.
    pub fn replace_categories(&mut self, mut categories: Vec<Category>) {
        for category in &mut categories {
            for service in &mut category.services {
                service.category_id = Some(category.id);
            }
        }

        self.services = categories
            .iter()
            .flat_map(|category| category.services.iter().cloned().map(Arc::new))
            .collect();
        self.categories = categories;
        self.categories_state = LoadState::Loaded;

        debug!(
            categories = self.categories.len(),
            services = self.services.len(),
            "Catalog categories replaced"
        );
    }

    /// Replaces the full rule set, keeping the given order.
    pub fn replace_rules(&mut self, rules: Vec<PricingRule>) {
        self.rules = rules;
        self.rules_state = LoadState::Loaded;

        debug!(rules = self.rules.len(), "Catalog rules replaced");
    }

    /// Records a failed load of `dataset`.
    ///
    /// Data from an earlier successful load is left as is.
    pub fn record_failure(&mut self, dataset: Dataset, message: impl Into<String>) {
        let message = message.into();
        let state = match dataset {
            Dataset::Categories => &mut self.categories_state,
            Dataset::Rules => &mut self.rules_state,
        };
        if !state.is_loaded() {
            *state = LoadState::Failed(message.clone());
        }
        self.last_error = Some(message);
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn load_state(&self, dataset: Dataset) -> &LoadState {
        match dataset {
            Dataset::Categories => &self.categories_state,
            Dataset::Rules => &self.rules_state,
        }
    }

    /// True once both datasets have been loaded at least once.
    pub fn is_ready(&self) -> bool {
        self.categories_state.is_loaded() && self.rules_state.is_loaded()
    }

    /// Human-readable message of the most recent failed load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn services(&self) -> &[Arc<Service>] {
        &self.services
    }

    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    pub fn category_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn service_by_id(&self, id: ServiceId) -> Option<Arc<Service>> {
        self.services.iter().find(|service| service.id == id).cloned()
    }

    /// Services of a category in their listed order; empty if unknown.
    pub fn services_of(&self, category_id: CategoryId) -> &[Service] {
        self.category_by_id(category_id)
            .map(|category| category.services.as_slice())
            .unwrap_or(&[])
    }

    /// All rules whose service target equals `name`, in loaded order.
    pub fn rules_for_service(&self, name: &str) -> Vec<&PricingRule> {
        self.rules
            .iter()
            .filter(|rule| rule.service.as_deref() == Some(name))
            .collect()
    }

    /// All rules whose category target equals `name`, in loaded order.
    pub fn rules_for_category(&self, name: &str) -> Vec<&PricingRule> {
        self.rules
            .iter()
            .filter(|rule| rule.category.as_deref() == Some(name))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Discount;

    fn sample_categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Cloud".to_string(),
                services: vec![
                    Service::new(10, "Backup", "Nightly backups", 5000),
                    Service::new(11, "Storage", "Object storage", 2000),
                ],
            },
            Category {
                id: 2,
                name: "Support".to_string(),
                services: vec![Service::new(20, "Hotline", "Phone support", 9900)],
            },
        ]
    }

    #[test]
    fn test_empty_store_queries() {
        let store = CatalogStore::new();
        assert!(store.category_by_id(1).is_none());
        assert!(store.service_by_id(10).is_none());
        assert!(store.services_of(1).is_empty());
        assert!(store.rules_for_service("Backup").is_empty());
        assert!(store.rules_for_category("Cloud").is_empty());
        assert!(!store.is_ready());
        assert_eq!(store.load_state(Dataset::Rules), &LoadState::NotLoaded);
    }

    #[test]
    fn test_replace_categories_backfills_category_id() {
        let mut store = CatalogStore::new();
        store.replace_categories(sample_categories());

        assert_eq!(store.services().len(), 3);
        assert_eq!(store.service_by_id(10).unwrap().category_id, Some(1));
        assert_eq!(store.service_by_id(20).unwrap().category_id, Some(2));
        assert!(store.services_of(1).iter().all(|s| s.category_id == Some(1)));
        assert!(store.load_state(Dataset::Categories).is_loaded());
    }

    #[test]
    fn test_services_of_keeps_order() {
        let mut store = CatalogStore::new();
        store.replace_categories(sample_categories());

        let names: Vec<&str> = store.services_of(1).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Backup", "Storage"]);
        assert!(store.services_of(99).is_empty());
    }

    #[test]
    fn test_rules_by_target_in_loaded_order() {
        let mut store = CatalogStore::new();
        store.replace_rules(vec![
            PricingRule::for_service("Backup", Discount::percentage(1000)),
            PricingRule::for_category("Cloud", Discount::percentage(500)),
            PricingRule::for_service("Backup", Discount::fixed(500)).with_min_quantity(3),
        ]);

        let rules = store.rules_for_service("Backup");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].discount, Discount::percentage(1000));
        assert_eq!(rules[1].discount, Discount::fixed(500));

        assert_eq!(store.rules_for_category("Cloud").len(), 1);
        assert!(store.rules_for_service("Storage").is_empty());
    }

    #[test]
    fn test_failure_before_load_marks_failed() {
        let mut store = CatalogStore::new();
        store.record_failure(Dataset::Rules, "HTTP error! status: 404");

        assert_eq!(
            store.load_state(Dataset::Rules),
            &LoadState::Failed("HTTP error! status: 404".to_string())
        );
        assert_eq!(store.last_error(), Some("HTTP error! status: 404"));

        store.clear_error();
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_failure_after_load_keeps_data() {
        let mut store = CatalogStore::new();
        store.replace_categories(sample_categories());
        store.record_failure(Dataset::Categories, "connection reset");

        assert!(store.load_state(Dataset::Categories).is_loaded());
        assert_eq!(store.categories().len(), 2);
        assert_eq!(store.last_error(), Some("connection reset"));
    }

    #[test]
    fn test_ready_requires_both_datasets() {
        let mut store = CatalogStore::new();
        store.replace_categories(sample_categories());
        assert!(!store.is_ready());

        store.replace_rules(Vec::new());
        assert!(store.is_ready());
    }
}
