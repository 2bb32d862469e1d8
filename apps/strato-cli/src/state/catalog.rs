//! # Catalog State
//!
//! The loaded catalog, shared between commands.
//!
//! Reads vastly outnumber writes (a write happens once per reload), so the
//! store sits behind an `RwLock`.

use std::sync::{PoisonError, RwLock};

use strato_core::CatalogStore;

#[derive(Debug, Default)]
pub struct CatalogState {
    store: RwLock<CatalogStore>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: CatalogStore) -> Self {
        CatalogState {
            store: RwLock::new(store),
        }
    }

    /// Executes a function with read access to the catalog.
    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CatalogStore) -> R,
    {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the catalog.
    pub fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CatalogStore) -> R,
    {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_core::{Category, Service};

    #[test]
    fn test_read_after_write() {
        let state = CatalogState::new();
        assert!(state.with_catalog(|store| store.categories().is_empty()));

        state.with_catalog_mut(|store| {
            store.replace_categories(vec![Category {
                id: 3,
                name: "Consulting".to_string(),
                services: vec![Service::new(30, "Audit", "Security audit", 120_000)],
            }])
        });

        let name = state.with_catalog(|store| store.service_by_id(30).map(|s| s.name.clone()));
        assert_eq!(name.as_deref(), Some("Audit"));
    }
}
