//! # Pricing Module
//!
//! Discount and total arithmetic plus the text formats amounts are written in.
//!
//! ## Where Amounts Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sale_price, discount% ──► discounted_price ──► line_total (× qty)      │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                Σ line_total ──► Bill.grand_total        │
//! │                                                                         │
//! │  Files:  cost / sale / discounted price → format_amount ("3.00")        │
//! │          discount / grand total        → format_plain  ("5", "27")      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are `f64`. Cost and sale price are held to whole cents (the
//! precision the files keep); the derived price is defined by the formula
//! below and compared with a small tolerance, never rounded in memory.

/// Applies a percentage discount to a sale price.
///
/// `sale_price - (discount_percent / 100) * sale_price`
///
/// ## Example
/// ```rust
/// use till_core::pricing::discounted_price;
///
/// assert!((discounted_price(15.00, 10.0) - 13.50).abs() < 1e-9);
/// assert!((discounted_price(5.00, 5.0) - 4.75).abs() < 1e-9);
/// assert_eq!(discounted_price(8.00, 100.0), 0.0);
/// ```
#[inline]
pub fn discounted_price(sale_price: f64, discount_percent: f64) -> f64 {
    sale_price - (discount_percent / 100.0) * sale_price
}

/// Multiplies a unit price by a quantity.
#[inline]
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    unit_price * quantity as f64
}

/// Rounds an amount to the nearest cent.
///
/// ```rust
/// use till_core::pricing::round_to_cents;
///
/// assert_eq!(round_to_cents(2.346), 2.35);
/// assert_eq!(round_to_cents(1.234), 1.23);
/// ```
#[inline]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Formats an amount with exactly two decimals (`3` → `"3.00"`).
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", normalize(amount))
}

/// Formats a number in its shortest round-trip form (`5.0` → `"5"`,
/// `12.5` → `"12.5"`).
///
/// Used for discount percentages and stored grand totals, so that reading
/// the text back yields the identical `f64`.
pub fn format_plain(value: f64) -> String {
    format!("{}", normalize(value))
}

/// Formats an amount for display with a currency symbol (`"Rs.27.00"`).
pub fn format_currency(symbol: &str, amount: f64) -> String {
    let amount = normalize(amount);
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, -amount)
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}

/// Returns true when two amounts agree within `tolerance`.
#[inline]
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Turns `-0.0` into `0.0` so it never prints as `-0`.
#[inline]
pub(crate) fn normalize(value: f64) -> f64 {
    value + 0.0
}

// =============================================================================
// Unit Tests
// =============================================================================
