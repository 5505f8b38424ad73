//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Basket and bill rule violations                │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  till-store errors (separate crate)                                    │
//! │  └── StoreError       - Persistence, malformed storage, lookups        │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → AppError → prompt     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal. The console prints the message and asks again.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Basket and bill rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bill was requested from an empty item snapshot.
    ///
    /// ## When This Occurs
    /// - "Generate bill" with nothing in the basket
    /// - A caller skipped its own emptiness check (the ledger checks again)
    #[error("Cannot create bill: no items in basket")]
    EmptyBasket,

    /// A 1-based basket position outside `[1, len]`.
    #[error("Line {position} does not exist (basket has {len} items)")]
    PositionOutOfRange { position: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant names the offending field so the operator can re-enter
/// just that value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// Invalid format (e.g., item code not matching the pattern).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// NaN or infinite amount.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
}

impl ValidationError {
    /// Returns the name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::Negative { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
