//! # Validation Module
//!
//! Field validation for basket items.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console prompt                                               │
//! │  ├── Parses text into numbers                                          │
//! │  └── Asks for confirmation when sale price < cost                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Item code pattern                                                 │
//! │  ├── Non-negative prices                                               │
//! │  ├── Discount within [0, 100]                                          │
//! │  └── Positive quantity                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reload (till-store)                                          │
//! │  └── Stored rows go through the same rules                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_item_code, validate_quantity};
//!
//! validate_item_code("Lemon_01").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::MAX_DISCOUNT_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Letters, then an optional `_` + alphanumeric suffix, then optional digits.
static ITEM_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+(_[A-Za-z0-9]+)?[0-9]*$").expect("item code pattern is valid")
});

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item code.
///
/// ## Rules
/// - Must not be empty
/// - One or more letters, optionally followed by `_` and alphanumerics,
///   optionally followed by trailing digits
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_item_code;
///
/// assert!(validate_item_code("Lemon_01").is_ok());
/// assert!(validate_item_code("LE_cup01").is_ok());
/// assert!(validate_item_code("Cake124").is_ok());
/// assert!(validate_item_code("124Cake").is_err());
/// assert!(validate_item_code("").is_err());
/// ```
pub fn validate_item_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item code".to_string(),
        });
    }

    if !ITEM_CODE_PATTERN.is_match(code) {
        return Err(ValidationError::InvalidFormat {
            field: "item code".to_string(),
            reason: "expected letters, optional _suffix and digits (e.g. Lemon_01, LE_cup01, Cake124)"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price (cost or sale price).
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative (zero is allowed)
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_price;
///
/// assert!(validate_price("cost", 0.0).is_ok());
/// assert!(validate_price("cost", 3.5).is_ok());
/// assert!(validate_price("cost", -1.0).is_err());
/// ```
pub fn validate_price(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be finite
/// - Must be between 0 and 100 (both inclusive)
pub fn validate_discount(percent: f64) -> ValidationResult<()> {
    if !percent.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "discount".to_string(),
        });
    }

    if !(0.0..=MAX_DISCOUNT_PERCENT).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0.0,
            max: MAX_DISCOUNT_PERCENT,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_code() {
        // Valid codes
        assert!(validate_item_code("Lemon_01").is_ok());
        assert!(validate_item_code("LE_cup01").is_ok());
        assert!(validate_item_code("Cake124").is_ok());
        assert!(validate_item_code("Bun").is_ok());
        assert!(validate_item_code("Tea_x").is_ok());

        // Invalid codes
        assert!(validate_item_code("").is_err());
        assert!(validate_item_code("   ").is_err());
        assert!(validate_item_code("124").is_err());
        assert!(validate_item_code("Cake-124").is_err());
        assert!(validate_item_code("Cake_").is_err());
        assert!(validate_item_code("Cake124a").is_err());
        assert!(validate_item_code("has space").is_err());
        assert!(validate_item_code("A_b_c").is_err());
    }

    #[test]
    fn test_validate_item_code_error_kind() {
        assert!(matches!(
            validate_item_code(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_item_code("1abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("cost", 0.0).is_ok());
        assert!(validate_price("cost", 10.99).is_ok());
        assert!(validate_price("cost", -0.01).is_err());
        assert!(validate_price("cost", f64::NAN).is_err());
        assert!(validate_price("cost", f64::INFINITY).is_err());

        let err = validate_price("sale price", -1.0).unwrap_err();
        assert_eq!(err.field(), "sale price");
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(0.0).is_ok());
        assert!(validate_discount(12.5).is_ok());
        assert!(validate_discount(100.0).is_ok());

        assert!(validate_discount(-0.5).is_err());
        assert!(validate_discount(100.01).is_err());
        assert!(validate_discount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }
}
