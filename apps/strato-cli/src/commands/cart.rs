//! # Cart Commands
//!
//! Cart manipulation. Every command returns the resulting snapshot.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   add_to_cart    ┌──────────┐                            │
//! │  │  Empty   │─────────────────►│ In Cart  │◄──┐ update_cart_item        │
//! │  │  Cart    │                  │          │───┘ increase / decrease     │
//! │  └──────────┘◄─────────────────└──────────┘     remove_from_cart        │
//! │       ▲          clear_cart /       │                                   │
//! │       │          last line removed  │ reload_catalog (catalog.rs)      │
//! │       │                             ▼                                   │
//! │       │                    recalculate_all_prices                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that target an existing line report `NOT_FOUND` when the service
//! is not in the cart; the ledger itself treats that case as a no-op.

use tracing::debug;

use strato_core::validation::validate_quantity;
use strato_core::ServiceId;

use crate::error::ApiError;
use crate::state::{CartSnapshot, CartState, CatalogState};

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartSnapshot {
    debug!("get_cart command");
    cart.snapshot()
}

/// Adds a service to the cart.
///
/// ## Behavior
/// - Service already in cart: quantities are summed and the line re-priced
/// - Service not in cart: added as a new line, priced once
///
/// ## Arguments
/// * `service_id` - Service to add
/// * `quantity` - Units to add (default: 1)
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    service_id: ServiceId,
    quantity: Option<i64>,
) -> Result<CartSnapshot, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(service_id, quantity, "add_to_cart command");
    validate_quantity(quantity)?;

    catalog.with_catalog(|store| {
        let service = store
            .service_by_id(service_id)
            .ok_or_else(|| ApiError::not_found("Service", service_id))?;

        cart.with_cart_mut(|cart| cart.add_item(store, service, quantity))?;
        Ok(cart.snapshot())
    })
}

/// Sets the quantity of a line. Zero or less removes it.
pub fn update_cart_item(
    catalog: &CatalogState,
    cart: &CartState,
    service_id: ServiceId,
    quantity: i64,
) -> Result<CartSnapshot, ApiError> {
    debug!(service_id, quantity, "update_cart_item command");
    ensure_in_cart(cart, service_id)?;

    catalog.with_catalog(|store| {
        cart.with_cart_mut(|cart| cart.update_quantity(store, service_id, quantity))
    })?;
    Ok(cart.snapshot())
}

pub fn increase_cart_item(
    catalog: &CatalogState,
    cart: &CartState,
    service_id: ServiceId,
) -> Result<CartSnapshot, ApiError> {
    debug!(service_id, "increase_cart_item command");
    ensure_in_cart(cart, service_id)?;

    catalog.with_catalog(|store| {
        cart.with_cart_mut(|cart| cart.increase_quantity(store, service_id))
    })?;
    Ok(cart.snapshot())
}

/// Removes one unit; the line disappears when it reaches zero.
pub fn decrease_cart_item(
    catalog: &CatalogState,
    cart: &CartState,
    service_id: ServiceId,
) -> Result<CartSnapshot, ApiError> {
    debug!(service_id, "decrease_cart_item command");
    ensure_in_cart(cart, service_id)?;

    catalog.with_catalog(|store| {
        cart.with_cart_mut(|cart| cart.decrease_quantity(store, service_id))
    })?;
    Ok(cart.snapshot())
}

pub fn remove_from_cart(cart: &CartState, service_id: ServiceId) -> Result<CartSnapshot, ApiError> {
    debug!(service_id, "remove_from_cart command");
    cart.with_cart_mut(|cart| cart.remove_item(service_id))
        .ok_or_else(|| ApiError::not_found("Cart line for service", service_id))?;
    Ok(cart.snapshot())
}

pub fn clear_cart(cart: &CartState) -> CartSnapshot {
    debug!("clear_cart command");
    cart.with_cart_mut(|cart| cart.clear());
    cart.snapshot()
}

fn ensure_in_cart(cart: &CartState, service_id: ServiceId) -> Result<(), ApiError> {
    let present = cart.with_cart(|cart| cart.get_item_by_service_id(service_id).is_some());
    if present {
        Ok(())
    } else {
        Err(ApiError::not_found("Cart line for service", service_id))
    }
}
