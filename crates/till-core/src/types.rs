//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │   ItemRecord    │   │      Bill       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  validated      │──►│  plain copy     │──►│  id (1001..)    │       │
//! │  │  basket line    │   │  (snapshot)     │   │  created_on     │       │
//! │  │  private fields │   │  pub fields     │   │  items (frozen) │       │
//! │  │                 │   │                 │   │  grand_total    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A bill never references basket items. It owns `ItemRecord` copies taken
//! when it was created, so editing or clearing the basket afterwards cannot
//! change it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing;
use crate::validation::{validate_discount, validate_item_code, validate_price, validate_quantity};

/// Sequential bill identifier.
pub type BillId = u64;

// =============================================================================
// Item Record
// =============================================================================

/// A detached copy of one basket line.
///
/// This is what bills store and what the files are written from. It carries
/// no invariants of its own; [`Item`] is where they are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub item_code: String,
    pub cost: f64,
    pub sale_price: f64,
    pub discount_percent: f64,
    pub discounted_price: f64,
    pub quantity: i64,
}

impl ItemRecord {
    /// Discounted price × quantity.
    #[inline]
    pub fn line_total(&self) -> f64 {
        pricing::line_total(self.discounted_price, self.quantity)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A validated basket line.
///
/// ## Invariants
/// - `item_code` matches the item code pattern
/// - `cost`, `sale_price` are finite and non-negative
/// - `discount_percent` is within `[0, 100]`
/// - `quantity > 0`
/// - `discounted_price == sale_price - (discount_percent / 100) * sale_price`
///
/// Fields are private so the derived price cannot drift from its inputs.
/// Changing an item means building a new one with [`Item::with_prices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    item_code: String,
    cost: f64,
    sale_price: f64,
    discount_percent: f64,
    discounted_price: f64,
    quantity: i64,
}

impl Item {
    /// Validates the inputs and computes the discounted price.
    ///
    /// Cost and sale price are rounded to whole cents, so `2.346` is kept
    /// as `2.35`.
    ///
    /// Fields are checked in entry order (code, cost, sale price, discount,
    /// quantity); the first failure is returned.
    ///
    /// A sale price below cost is accepted here. Asking the operator to
    /// confirm it is the console's job (see [`Item::is_below_cost`]).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::Item;
    ///
    /// let item = Item::new("Lemon_01", 3.00, 5.00, 5.0, 1).unwrap();
    /// assert!((item.discounted_price() - 4.75).abs() < 1e-9);
    ///
    /// assert!(Item::new("Lemon_01", 3.00, 5.00, 120.0, 1).is_err());
    /// ```
    pub fn new(
        item_code: impl Into<String>,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        let item_code = item_code.into();

        validate_item_code(&item_code)?;
        let cost = to_cents("cost", cost)?;
        let sale_price = to_cents("sale price", sale_price)?;
        validate_discount(discount_percent)?;
        validate_quantity(quantity)?;

        let discount_percent = pricing::normalize(discount_percent);

        Ok(Item {
            item_code,
            cost,
            sale_price,
            discount_percent,
            discounted_price: pricing::discounted_price(sale_price, discount_percent),
            quantity,
        })
    }

    /// Builds a replacement item with the same code and new prices/quantity.
    ///
    /// The item code never changes across an update.
    pub fn with_prices(
        &self,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        Item::new(
            self.item_code.clone(),
            cost,
            sale_price,
            discount_percent,
            quantity,
        )
    }

    pub fn item_code(&self) -> &str {
        &self.item_code
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price
    }

    pub fn discount_percent(&self) -> f64 {
        self.discount_percent
    }

    pub fn discounted_price(&self) -> f64 {
        self.discounted_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Discounted price × quantity.
    #[inline]
    pub fn line_total(&self) -> f64 {
        pricing::line_total(self.discounted_price, self.quantity)
    }

    /// True when the item sells below its internal cost.
    #[inline]
    pub fn is_below_cost(&self) -> bool {
        self.sale_price < self.cost
    }

    /// Returns a detached plain copy.
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            item_code: self.item_code.clone(),
            cost: self.cost,
            sale_price: self.sale_price,
            discount_percent: self.discount_percent,
            discounted_price: self.discounted_price,
            quantity: self.quantity,
        }
    }
}

/// Checks a price, then rounds it to cents.
fn to_cents(field: &'static str, amount: f64) -> Result<f64, ValidationError> {
    validate_price(field, amount)?;
    let rounded = pricing::round_to_cents(amount);
    validate_price(field, rounded)?;
    Ok(pricing::normalize(rounded))
}

/// Rebuilds a validated item from a plain record.
///
/// The record's `discounted_price` is ignored and recomputed.
impl TryFrom<ItemRecord> for Item {
    type Error = ValidationError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        Item::new(
            record.item_code,
            record.cost,
            record.sale_price,
            record.discount_percent,
            record.quantity,
        )
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        ItemRecord {
            item_code: item.item_code,
            cost: item.cost,
            sale_price: item.sale_price,
            discount_percent: item.discount_percent,
            discounted_price: item.discounted_price,
            quantity: item.quantity,
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An immutable, sequentially identified snapshot of billed items.
///
/// ## Invariants
/// - At least one item
/// - `grand_total` is fixed at creation and never recomputed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    bill_id: BillId,
    created_on: NaiveDate,
    items: Vec<ItemRecord>,
    grand_total: f64,
}

impl Bill {
    /// Creates a bill from a basket snapshot, computing its grand total.
    ///
    /// Each record is rebuilt through [`Item`], so a hand-made record gets
    /// cent prices and a recomputed discounted price like a basket line.
    ///
    /// ## Errors
    /// - `CoreError::EmptyBasket` when `items` is empty
    /// - `CoreError::Validation` when a record breaks an item invariant
    pub fn new(bill_id: BillId, created_on: NaiveDate, items: Vec<ItemRecord>) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::EmptyBasket);
        }

        let items = items
            .into_iter()
            .map(|record| Item::try_from(record).map(ItemRecord::from))
            .collect::<Result<Vec<_>, _>>()?;

        let grand_total = sum_line_totals(&items);
        Ok(Bill {
            bill_id,
            created_on,
            items,
            grand_total,
        })
    }

    /// Rebuilds a previously created bill with its stored grand total.
    ///
    /// Used when reloading persisted bills.
    pub fn restore(
        bill_id: BillId,
        created_on: NaiveDate,
        items: Vec<ItemRecord>,
        grand_total: f64,
    ) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::EmptyBasket);
        }

        Ok(Bill {
            bill_id,
            created_on,
            items,
            grand_total,
        })
    }

    pub fn id(&self) -> BillId {
        self.bill_id
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Sum of the frozen items' line totals.
    ///
    /// Equals `grand_total` for a bill built with [`Bill::new`]; a restored
    /// bill may differ by the rounding of its stored prices.
    pub fn computed_total(&self) -> f64 {
        sum_line_totals(&self.items)
    }
}

/// Σ discounted price × quantity.
pub fn sum_line_totals(items: &[ItemRecord]) -> f64 {
    items.iter().map(ItemRecord::line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_item_derives_discounted_price() {
        let item = Item::new("Cake124", 10.0, 15.0, 10.0, 2).unwrap();
        assert!((item.discounted_price() - 13.5).abs() < 1e-9);
        assert!((item.line_total() - 27.0).abs() < 1e-9);
        assert!(!item.is_below_cost());
    }

    #[test]
    fn test_item_rejects_each_field() {
        let field = |r: Result<Item, ValidationError>| r.unwrap_err().field().to_string();

        assert_eq!(field(Item::new("", 1.0, 1.0, 0.0, 1)), "item code");
        assert_eq!(field(Item::new("9x", 1.0, 1.0, 0.0, 1)), "item code");
        assert_eq!(field(Item::new("Bun", -1.0, 1.0, 0.0, 1)), "cost");
        assert_eq!(field(Item::new("Bun", 1.0, -1.0, 0.0, 1)), "sale price");
        assert_eq!(field(Item::new("Bun", 1.0, 1.0, 101.0, 1)), "discount");
        assert_eq!(field(Item::new("Bun", 1.0, 1.0, 0.0, 0)), "quantity");
    }

    #[test]
    fn test_item_prices_are_held_to_cents() {
        let item = Item::new("Bun", 1.234, 2.346, 10.0, 3).unwrap();
        assert_eq!(item.cost(), 1.23);
        assert_eq!(item.sale_price(), 2.35);
        assert!((item.discounted_price() - 2.115).abs() < 1e-9);

        assert_eq!(Item::new("Bun", -0.001, 1.0, 0.0, 1).unwrap_err().field(), "cost");
    }

    #[test]
    fn test_bill_rebuilds_raw_records() {
        let raw = ItemRecord {
            item_code: "Bun".to_string(),
            cost: 1.234,
            sale_price: 2.346,
            discount_percent: 10.0,
            discounted_price: 99.0,
            quantity: 2,
        };
        let bill = Bill::new(1001, date(), vec![raw.clone()]).unwrap();
        assert_eq!(bill.items()[0].sale_price, 2.35);
        assert!((bill.items()[0].discounted_price - 2.115).abs() < 1e-9);

        let broken = ItemRecord { quantity: 0, ..raw };
        assert!(matches!(
            Bill::new(1001, date(), vec![broken]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_item_below_cost_is_allowed() {
        let item = Item::new("Bun", 5.0, 4.0, 0.0, 1).unwrap();
        assert!(item.is_below_cost());
    }

    #[test]
    fn test_with_prices_keeps_code_and_recomputes() {
        let item = Item::new("LE_cup01", 1.0, 2.0, 0.0, 1).unwrap();
        let updated = item.with_prices(1.5, 4.0, 25.0, 3).unwrap();

        assert_eq!(updated.item_code(), "LE_cup01");
        assert!((updated.discounted_price() - 3.0).abs() < 1e-9);
        assert_eq!(updated.quantity(), 3);
        assert!(item.with_prices(1.0, 2.0, 0.0, -2).is_err());
    }

    #[test]
    fn test_item_deserialize_recomputes_discounted_price() {
        let json = r#"{"itemCode":"Bun","cost":1.0,"salePrice":10.0,
            "discountPercent":50.0,"discountedPrice":9.0,"quantity":1}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!((item.discounted_price() - 5.0).abs() < 1e-9);

        let bad = r#"{"itemCode":"Bun","cost":1.0,"salePrice":10.0,
            "discountPercent":150.0,"discountedPrice":0.0,"quantity":1}"#;
        assert!(serde_json::from_str::<Item>(bad).is_err());
    }

    #[test]
    fn test_bill_grand_total() {
        let items = vec![
            Item::new("Cake124", 10.0, 15.0, 10.0, 2).unwrap().to_record(),
            Item::new("Lemon_01", 3.0, 5.0, 5.0, 3).unwrap().to_record(),
        ];
        let bill = Bill::new(1001, date(), items).unwrap();

        assert_eq!(bill.id(), 1001);
        assert_eq!(bill.item_count(), 2);
        assert!((bill.grand_total() - (27.0 + 14.25)).abs() < 1e-9);
        assert_eq!(bill.grand_total(), bill.computed_total());
    }

    #[test]
    fn test_bill_rejects_empty_snapshot() {
        assert!(matches!(
            Bill::new(1001, date(), Vec::new()),
            Err(CoreError::EmptyBasket)
        ));
    }

    #[test]
    fn test_restore_keeps_stored_total() {
        let items = vec![Item::new("Bun", 1.0, 2.0, 0.0, 1).unwrap().to_record()];
        let bill = Bill::restore(1005, date(), items, 2.01).unwrap();
        assert_eq!(bill.grand_total(), 2.01);
        assert_eq!(bill.computed_total(), 2.0);
    }
}
