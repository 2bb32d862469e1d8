//! # strato-core: Pure Business Logic for Stratocore Services
//!
//! Catalog lookups, pricing rule resolution and cart math as pure,
//! synchronous functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stratocore Services Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  strato-cli (session / views)                   │   │
//! │  │      home ──► category ──► add to cart ──► cart totals          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ strato-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  pricing  │  │   cart    │  │   money   │  │   │
//! │  │   │  lookups  │─►│  rules    │◄─│  ledger   │  │   cents   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │              strato-data (Catalog Loader)                       │   │
//! │  │        services.json, pricerules.json over HTTP / files         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Category, PricingRule, ...)
//! - [`money`] - Money type with integer arithmetic, discount rates
//! - [`catalog`] - Catalog Store with explicit load state
//! - [`pricing`] - Pricing Rule Engine
//! - [`cart`] - Cart Ledger and aggregate totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use strato_core::{CatalogStore, Category, Discount, PricingRule, Service};
//! use strato_core::pricing::resolve_price;
//!
//! let mut catalog = CatalogStore::new();
//! catalog.replace_categories(vec![Category {
//!     id: 1,
//!     name: "Cloud".to_string(),
//!     services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
//! }]);
//! catalog.replace_rules(vec![PricingRule::for_service("Backup", Discount::percentage(1000))]);
//!
//! let service = catalog.service_by_id(10).unwrap();
//! let resolution = resolve_price(&catalog, &service, 1);
//! assert_eq!(resolution.unit_price.cents(), 4500); // $45.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{CatalogStore, Dataset, LoadState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use pricing::{resolve_price, PriceResolution};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single service in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
