//! # State Module
//!
//! Shared application state for the session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │  CatalogState    │  │   CartState      │  │   AppConfig      │      │
//! │  │                  │  │                  │  │                  │      │
//! │  │  RwLock<         │  │  Mutex<Cart>     │  │  data location   │      │
//! │  │   CatalogStore>  │  │  watch::Sender<  │  │  currency format │      │
//! │  │                  │  │   CartSnapshot>  │  │                  │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  LOCK ORDER: catalog (read) before cart. Never hold either across      │
//! │  an .await.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;

pub use cart::{CartSnapshot, CartState};
pub use catalog::CatalogState;
pub use config::{AppConfig, DataConfig, DataLocation, DisplayConfig};
