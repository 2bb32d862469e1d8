//! # Validation Module
//!
//! Input validation for cart operations and user-entered identifiers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Session input (strato-cli)                                   │
//! │  └── parse_id(): "abc", "0", "-3" rejected before any lookup           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart Ledger (THIS MODULE)                                    │
//! │  ├── validate_quantity(): 1..=999 for new lines and updates             │
//! │  └── validate_cart_size(): at most 100 lines                           │
//! │                                                                         │
//! │  Non-positive quantities on update never get here: they mean removal.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parses a user-entered identifier.
///
/// ## Rules
/// - Must be an integer
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use strato_core::validation::parse_id;
///
/// assert_eq!(parse_id("42", "category id").unwrap(), 42);
/// assert!(parse_id("0", "category id").is_err());
/// assert!(parse_id("cloud", "category id").is_err());
/// ```
pub fn parse_id(raw: &str, field: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let id: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a number", raw),
    })?;

    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(id)
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}
