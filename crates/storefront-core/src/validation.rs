//! # Validation Module
//!
//! Input validation for values that end up in request paths and bodies.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI                                                │
//! │  └── Location picker, date/time picker                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: storefront-client (Rust)                                     │
//! │  └── THIS MODULE: reject location ids that would break a request path  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Commerce API                                                 │
//! │  └── Owns every business rule; the client only mirrors it              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use storefront_core::validation::{validate_location_id, validate_order_date};
//!
//! assert!(validate_location_id("L1").is_ok());
//! assert!(validate_location_id("").is_err());
//! assert!(validate_order_date("2024-05-01").is_ok());
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest location identifier accepted in a request path.
pub const MAX_ID_LENGTH: usize = 128;

// =============================================================================
// Identifier Validators
// =============================================================================

fn validate_path_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
        });
    }

    if id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace, '/', '?', '#' or '%'".to_string(),
        });
    }

    Ok(())
}

/// Validates a location identifier (required, path safe).
pub fn validate_location_id(location_id: &str) -> ValidationResult<()> {
    validate_path_id("locationId", location_id)
}

/// Validates a cart identifier.
///
/// Cart ids are opaque server tokens: only presence is checked. Callers
/// percent-encode them before putting them in a path.
pub fn validate_cart_id(cart_id: &str) -> ValidationResult<()> {
    if cart_id.is_empty() {
        return Err(ValidationError::Required {
            field: "cartId".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Schedule Validators
// =============================================================================

/// Validates an order date in `YYYY-MM-DD` form.
pub fn validate_order_date(order_date: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(order_date, "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: "orderDate".to_string(),
            reason: e.to_string(),
        }
    })
}

/// Validates an order time in `HH:MM` or `HH:MM:SS` form.
pub fn validate_order_time(order_time: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(order_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(order_time, "%H:%M:%S"))
        .map_err(|e| ValidationError::InvalidFormat {
            field: "orderTime".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_location_id() {
        assert!(validate_location_id("L1").is_ok());
        assert!(validate_location_id("loc_9f8e-7d").is_ok());

        assert_eq!(
            validate_location_id("   "),
            Err(ValidationError::Required {
                field: "locationId".to_string()
            })
        );
        assert!(validate_location_id("a/b").is_err());
        assert!(validate_location_id("a b").is_err());
        assert!(validate_location_id(&"x".repeat(MAX_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_cart_id() {
        assert!(validate_cart_id("c_123").is_ok());
        assert!(validate_cart_id("c/abc+def==").is_ok());
        assert!(validate_cart_id("c?x=1 #%").is_ok());
        assert!(validate_cart_id(&"x".repeat(MAX_ID_LENGTH * 2)).is_ok());
        assert!(validate_cart_id("").is_err());
    }

    #[test]
    fn test_validate_order_date() {
        assert!(validate_order_date("2024-02-29").is_ok());
        assert!(validate_order_date("2023-02-29").is_err());
        assert!(validate_order_date("05/01/2024").is_err());
    }

    #[test]
    fn test_validate_order_time() {
        assert!(validate_order_time("12:30").is_ok());
        assert!(validate_order_time("23:59:59").is_ok());
        assert!(validate_order_time("25:00").is_err());
        assert!(validate_order_time("noon").is_err());
    }
}
