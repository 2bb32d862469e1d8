//! # Catalog Loader
//!
//! One-shot asynchronous fetches of the datasets, and application of the
//! results to a [`CatalogStore`].
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_catalog()                                                        │
//! │     ├── fetch_categories() ─┐                                           │
//! │     └── fetch_rules() ──────┴── tokio::join! (concurrent)               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  CatalogFetch::apply_to(&mut store)   (sync, under the caller's lock)  │
//! │     ├── Ok(categories) ──► store.replace_categories()                  │
//! │     ├── Err(e)         ──► store.record_failure(Categories, e)         │
//! │     ├── Ok(rules)      ──► store.replace_rules()                       │
//! │     └── Err(e)         ──► store.record_failure(Rules, e)              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            LoadReport                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each dataset is applied on its own: a failed rules fetch does not stop the
//! categories from loading, and a failed fetch never touches data that was
//! loaded earlier.

use std::sync::Arc;

use tracing::{info, warn};

use strato_core::{CatalogStore, Category, Dataset, Order, PricingRule, User};

use crate::error::{LoadError, LoadResult};
use crate::records::{decode_categories, decode_orders, decode_rules, decode_users};
use crate::source::{DataSource, Resource};

/// Fetches and decodes datasets from a [`DataSource`].
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn DataSource>,
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("source", &self.source.describe())
            .finish()
    }
}

impl CatalogLoader {
    pub fn new(source: impl DataSource + 'static) -> Self {
        CatalogLoader {
            source: Arc::new(source),
        }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    // =========================================================================
    // Single datasets
    // =========================================================================

    pub async fn fetch_categories(&self) -> LoadResult<Vec<Category>> {
        let bytes = self.source.fetch(Resource::Services).await?;
        decode_categories(&bytes)
    }

    /// Fetches the rule set; a missing `type` is normalized to percentage.
    pub async fn fetch_rules(&self) -> LoadResult<Vec<PricingRule>> {
        let bytes = self.source.fetch(Resource::PriceRules).await?;
        decode_rules(&bytes)
    }

    pub async fn fetch_users(&self) -> LoadResult<Vec<User>> {
        let bytes = self.source.fetch(Resource::Users).await?;
        decode_users(&bytes)
    }

    pub async fn fetch_user_by_id(&self, id: i64) -> LoadResult<Option<User>> {
        let users = self.fetch_users().await?;
        Ok(users.into_iter().find(|user| user.id == id))
    }

    pub async fn fetch_orders(&self) -> LoadResult<Vec<Order>> {
        let bytes = self.source.fetch(Resource::Orders).await?;
        decode_orders(&bytes)
    }

    /// Order history of one user, in dataset order.
    pub async fn fetch_orders_for_user(&self, user_id: i64) -> LoadResult<Vec<Order>> {
        let orders = self.fetch_orders().await?;
        Ok(orders
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetches categories and rules concurrently.
    pub async fn fetch_catalog(&self) -> CatalogFetch {
        let (categories, rules) = tokio::join!(self.fetch_categories(), self.fetch_rules());
        CatalogFetch { categories, rules }
    }

    /// Fetches both catalog datasets and applies them to `store`.
    pub async fn load_into(&self, store: &mut CatalogStore) -> LoadReport {
        self.fetch_catalog().await.apply_to(store)
    }
}

/// Results of a catalog fetch, not yet applied to a store.
#[derive(Debug)]
pub struct CatalogFetch {
    pub categories: LoadResult<Vec<Category>>,
    pub rules: LoadResult<Vec<PricingRule>>,
}

impl CatalogFetch {
    /// Applies each dataset independently.
    pub fn apply_to(self, store: &mut CatalogStore) -> LoadReport {
        let categories = match self.categories {
            Ok(categories) => {
                let count = categories.len();
                store.replace_categories(categories);
                DatasetOutcome::Loaded { count }
            }
            Err(err) => fail(store, Dataset::Categories, err),
        };

        let rules = match self.rules {
            Ok(rules) => {
                let count = rules.len();
                store.replace_rules(rules);
                DatasetOutcome::Loaded { count }
            }
            Err(err) => fail(store, Dataset::Rules, err),
        };

        let report = LoadReport { categories, rules };
        if report.is_complete() {
            store.clear_error();
            info!(
                categories = report.categories.count().unwrap_or(0),
                rules = report.rules.count().unwrap_or(0),
                "Catalog loaded"
            );
        }
        report
    }
}

fn fail(store: &mut CatalogStore, dataset: Dataset, err: LoadError) -> DatasetOutcome {
    warn!(%dataset, error = %err, "Failed to load {}", dataset);
    store.record_failure(dataset, err.to_string());
    DatasetOutcome::Failed(err)
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug)]
pub enum DatasetOutcome {
    Loaded { count: usize },
    Failed(LoadError),
}

impl DatasetOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DatasetOutcome::Loaded { .. })
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            DatasetOutcome::Loaded { count } => Some(*count),
            DatasetOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            DatasetOutcome::Loaded { .. } => None,
            DatasetOutcome::Failed(err) => Some(err),
        }
    }
}

/// What happened to each catalog dataset during a load.
#[derive(Debug)]
pub struct LoadReport {
    pub categories: DatasetOutcome,
    pub rules: DatasetOutcome,
}

impl LoadReport {
    /// True when both datasets loaded.
    pub fn is_complete(&self) -> bool {
        self.categories.is_loaded() && self.rules.is_loaded()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Dataset, &LoadError)> {
        [
            (Dataset::Categories, self.categories.error()),
            (Dataset::Rules, self.rules.error()),
        ]
        .into_iter()
        .filter_map(|(dataset, err)| err.map(|err| (dataset, err)))
    }
}
