//! # Tax Line Checksum
//!
//! Formats one billed item as a tax transaction line and tags it with a
//! character-count checksum.
//!
//! ```text
//!   ItemCode , Cost , SalePrice , Discount , DiscountedPrice  │ Checksum
//!   Lemon_01 , 3.00 , 5.00      , 5        , 4.75             │ 20
//!   └──────────────── checksummed text ─────────────────┘
//! ```
//!
//! The checksum counts upper-case letters, lower-case letters, and
//! characters that are decimal digits or `.`. It detects corruption, it is
//! not a cryptographic guarantee.

use std::fmt;

use serde::Serialize;

use crate::pricing::{format_amount, format_plain};
use crate::types::ItemRecord;

/// Computes the checksum of a transaction line.
///
/// ## Example
/// ```rust
/// use till_core::checksum;
///
/// // 1 capital + 4 lower-case + 15 digits/dots
/// assert_eq!(checksum("Lemon_01,3.00,5.00,5,4.75"), 20);
/// ```
pub fn checksum(line: &str) -> u32 {
    let mut capitals = 0u32;
    let mut lowers = 0u32;
    let mut digits_and_dots = 0u32;

    for c in line.chars() {
        if c.is_uppercase() {
            capitals += 1;
        } else if c.is_lowercase() {
            lowers += 1;
        } else if c.is_ascii_digit() || c == '.' {
            digits_and_dots += 1;
        }
    }

    capitals + lowers + digits_and_dots
}

/// The checksummed columns of a tax line, in file order.
///
/// `itemCode, cost (2dp), salePrice (2dp), discount (plain), discountedPrice (2dp)`
pub fn transaction_fields(
    item_code: &str,
    cost: f64,
    sale_price: f64,
    discount_percent: f64,
    discounted_price: f64,
) -> [String; 5] {
    [
        item_code.to_string(),
        format_amount(cost),
        format_amount(sale_price),
        format_plain(discount_percent),
        format_amount(discounted_price),
    ]
}

/// Joins [`transaction_fields`] into the text the checksum is taken over.
pub fn transaction_line(
    item_code: &str,
    cost: f64,
    sale_price: f64,
    discount_percent: f64,
    discounted_price: f64,
) -> String {
    transaction_fields(item_code, cost, sale_price, discount_percent, discounted_price).join(",")
}

/// One tax transaction line with its checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    /// Formatted columns, without the checksum.
    pub fields: [String; 5],
    pub checksum: u32,
}

impl TaxLine {
    /// Builds the tax line for a billed item.
    pub fn from_record(record: &ItemRecord) -> Self {
        TaxLine::new(transaction_fields(
            &record.item_code,
            record.cost,
            record.sale_price,
            record.discount_percent,
            record.discounted_price,
        ))
    }

    /// Tags already formatted columns.
    pub fn new(fields: [String; 5]) -> Self {
        let checksum = checksum(&fields.join(","));
        TaxLine { fields, checksum }
    }

    /// The checksummed text, `fields` joined by commas.
    pub fn line(&self) -> String {
        self.fields.join(",")
    }

    /// Every column of the file row, checksum last.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = self.fields.to_vec();
        row.push(self.checksum.to_string());
        row
    }
}

/// Writes the full row, `line,checksum`.
impl fmt::Display for TaxLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line(), self.checksum)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
