//! # Commands Module
//!
//! One function per user action. The session parses a line, calls exactly
//! one of these, and renders what comes back.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Category listing, category page, reload
//! ├── cart.rs     ◄─── Cart manipulation
//! └── history.rs  ◄─── Past orders of a user
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the catalog
//! fn list_categories(catalog: &CatalogState) -> Vec<CategorySummary>
//!
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartSnapshot
//!
//! // Needs both (prices come from the catalog's rules)
//! fn add_to_cart(catalog: &CatalogState, cart: &CartState, ...)
//! ```

pub mod cart;
pub mod catalog;
pub mod history;
