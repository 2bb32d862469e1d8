//! # Catalog Commands
//!
//! Browsing and (re)loading the catalog.
//!
//! ## Reload
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reload_catalog()                                                       │
//! │     1. loader.fetch_catalog().await       (no lock held)               │
//! │     2. catalog.with_catalog_mut(apply_to) (write lock, sync)           │
//! │     3. cart.recalculate_all_prices()      (catalog read + cart lock)   │
//! │                                                                         │
//! │  Rules may arrive after items were added: step 3 re-prices them.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use strato_core::{CategoryId, Money, ServiceId};
use strato_data::CatalogLoader;

use crate::error::ApiError;
use crate::state::{CartState, CatalogState};

/// One row of the home page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub service_count: usize,
}

/// A service as shown on a category page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price: Money,

    /// Quantity already in the cart (0 if none).
    pub in_cart: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub services: Vec<ServiceView>,
}

/// Load health shown above the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub ready: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadSummary {
    pub categories: Option<usize>,
    pub rules: Option<usize>,
    pub errors: Vec<String>,
}

/// Lists all categories in catalog order.
pub fn list_categories(catalog: &CatalogState) -> Vec<CategorySummary> {
    debug!("list_categories command");
    catalog.with_catalog(|store| {
        store
            .categories()
            .iter()
            .map(|category| CategorySummary {
                id: category.id,
                name: category.name.clone(),
                service_count: category.services.len(),
            })
            .collect()
    })
}

/// Gets one category with its services and their cart quantities.
pub fn get_category(
    catalog: &CatalogState,
    cart: &CartState,
    category_id: CategoryId,
) -> Result<CategoryView, ApiError> {
    debug!(category_id, "get_category command");
    catalog.with_catalog(|store| {
        let category = store
            .category_by_id(category_id)
            .ok_or_else(|| ApiError::not_found("Category", category_id))?;

        let services = cart.with_cart(|cart| {
            store
                .services_of(category_id)
                .iter()
                .map(|service| ServiceView {
                    id: service.id,
                    name: service.name.clone(),
                    description: service.description.clone(),
                    price: service.price(),
                    in_cart: cart
                        .get_item_by_service_id(service.id)
                        .map_or(0, |line| line.quantity),
                })
                .collect()
        });

        Ok(CategoryView {
            id: category.id,
            name: category.name.clone(),
            services,
        })
    })
}

pub fn catalog_status(catalog: &CatalogState) -> CatalogStatus {
    catalog.with_catalog(|store| CatalogStatus {
        ready: store.is_ready(),
        last_error: store.last_error().map(str::to_string),
    })
}

/// Reloads categories and rules, then re-prices the cart.
pub async fn reload_catalog(
    loader: &CatalogLoader,
    catalog: &CatalogState,
    cart: &CartState,
) -> ReloadSummary {
    info!(source = %loader.source_description(), "Reloading catalog");
    let fetched = loader.fetch_catalog().await;

    let report = catalog.with_catalog_mut(|store| fetched.apply_to(store));

    catalog.with_catalog(|store| {
        cart.with_cart_mut(|cart| cart.recalculate_all_prices(store));
    });

    ReloadSummary {
        categories: report.categories.count(),
        rules: report.rules.count(),
        errors: report.errors().map(|(_, err)| err.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use strato_data::DirSource;

    const SERVICES: &str = r#"{
        "categories": [
            { "id": 1, "name": "Cloud", "services": [
                { "id": 10, "name": "Backup", "description": "Nightly backups", "price": 50 },
                { "id": 11, "name": "Storage", "description": "Object storage", "price": 20 }
            ] },
            { "id": 2, "name": "Support", "services": [
                { "id": 20, "name": "Hotline", "description": "Phone support", "price": 99 }
            ] }
        ]
    }"#;

    #[tokio::test]
    async fn test_reload_then_browse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("services.json"), SERVICES).unwrap();
        std::fs::write(dir.path().join("pricerules.json"), r#"{"rules":[]}"#).unwrap();

        let loader = CatalogLoader::new(DirSource::new(dir.path()));
        let catalog = CatalogState::new();
        let cart = CartState::new();

        let summary = reload_catalog(&loader, &catalog, &cart).await;
        assert_eq!(summary.categories, Some(2));
        assert_eq!(summary.rules, Some(0));
        assert!(summary.errors.is_empty());
        assert!(catalog_status(&catalog).ready);

        let home = list_categories(&catalog);
        assert_eq!(home.len(), 2);
        assert_eq!(home[0].service_count, 2);

        let page = get_category(&catalog, &cart, 1).unwrap();
        assert_eq!(page.services.len(), 2);
        assert_eq!(page.services[0].price.cents(), 5000);
        assert_eq!(page.services[0].in_cart, 0);

        let err = get_category(&catalog, &cart, 9).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_reload_reprices_cart() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("services.json"), SERVICES).unwrap();

        let loader = CatalogLoader::new(DirSource::new(dir.path()));
        let catalog = CatalogState::new();
        let cart = CartState::new();

        // rules missing: categories still load
        let summary = reload_catalog(&loader, &catalog, &cart).await;
        assert_eq!(summary.rules, None);
        assert_eq!(summary.errors.len(), 1);
        assert!(catalog_status(&catalog).last_error.is_some());

        catalog.with_catalog(|store| {
            let backup = store.service_by_id(10).unwrap();
            cart.with_cart_mut(|cart| cart.add_item(store, backup, 1))
        })
        .unwrap();
        assert_eq!(cart.snapshot().totals.total_savings, Money::zero());

        std::fs::write(
            dir.path().join("pricerules.json"),
            r#"{"rules":[{"category":"Cloud","discount":0.2}]}"#,
        )
        .unwrap();
        reload_catalog(&loader, &catalog, &cart).await;

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.lines[0].discounted_price, Some(Money::from_cents(4000)));
        assert_eq!(snapshot.totals.total_savings.cents(), 1000);
        assert!(catalog_status(&catalog).last_error.is_none());
    }
}
