//! # strato-data: Catalog Loader for Stratocore Services
//!
//! Fetches the static JSON datasets over HTTP or from a local directory and
//! hands strato-core domain types to the rest of the system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stratocore Services Data Flow                       │
//! │                                                                         │
//! │  Session command (reload)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   strato-data (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Sources     │    │   Records     │    │   Loader     │  │   │
//! │  │   │  (source.rs)  │    │ (records.rs)  │    │ (loader.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ HttpSource    │───►│ JSON → domain │───►│ CatalogStore │  │   │
//! │  │   │ DirSource     │    │ cents / bps   │    │ LoadReport   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  services.json • pricerules.json • user.json • orders.json             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`source`] - Data sources (HTTP, local directory)
//! - [`records`] - Wire records and conversion to domain types
//! - [`loader`] - Catalog loader and load reports
//! - [`error`] - Load error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strato_core::CatalogStore;
//! use strato_data::{CatalogLoader, HttpSource};
//!
//! let loader = CatalogLoader::new(HttpSource::new("http://localhost:5173/data")?);
//! let mut store = CatalogStore::new();
//! let report = loader.load_into(&mut store).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loader;
pub mod records;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LoadError, LoadResult};
pub use loader::{CatalogFetch, CatalogLoader, DatasetOutcome, LoadReport};
pub use source::{DataSource, DirSource, HttpSource, Resource};
