//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till. It contains the basket, bill and
//! checksum rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/cli)                           │   │
//! │  │    Menu ──► Add/Update/Delete ──► Generate Bill ──► Tax Export  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  basket   │  │  pricing  │  │ checksum  │  │   │
//! │  │   │   Item    │  │  Basket   │  │ discount  │  │ tax lines │  │   │
//! │  │   │   Bill    │  │  Store    │  │  totals   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO TERMINAL • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              till-store (Flat-File Layer)                       │   │
//! │  │        BillLedger, bills.csv, bill_items_<id>.csv, TTF export   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, ItemRecord, Bill)
//! - [`basket`] - The mutable basket with 1-based positional editing
//! - [`pricing`] - Discount, line total and display formatting
//! - [`checksum`] - Tax transaction line format and checksum
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{BasketStore, Bill};
//! use chrono::NaiveDate;
//!
//! let mut basket = BasketStore::new();
//! let item = basket.add("Cake124", 10.00, 15.00, 10.0, 2).unwrap();
//! assert!((item.discounted_price() - 13.50).abs() < 1e-9);
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let bill = Bill::new(till_core::FIRST_BILL_ID, date, basket.snapshot()).unwrap();
//! assert!((bill.grand_total() - 27.00).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod checksum;
pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::BasketStore;
pub use checksum::{checksum, transaction_fields, transaction_line, TaxLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier given to the first bill of an empty ledger.
pub const FIRST_BILL_ID: BillId = 1001;

/// Upper bound of the discount percentage (inclusive).
pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;

/// Tolerance used when comparing derived amounts.
///
/// Stored amounts go through 2-decimal formatting, so checks that compare a
/// stored value against a recomputed one use this rather than exact equality.
pub const AMOUNT_TOLERANCE: f64 = 0.005 + 1e-9;
