//! # Basket Store
//!
//! The mutable working set of not-yet-billed item lines.
//!
//! ## Basket Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Operations                                    │
//! │                                                                         │
//! │  Menu Action              Method                  State Change          │
//! │  ───────────              ──────                  ────────────          │
//! │                                                                         │
//! │  Add Item ───────────────► add() ───────────────► items.push(item)     │
//! │                                                                         │
//! │  Update Item ────────────► update_at(n) ────────► items[n-1] = new     │
//! │                                                                         │
//! │  Delete Item ────────────► delete_at(n) ────────► items.remove(n-1)    │
//! │                                                                         │
//! │  Generate Bill ──────────► snapshot() ──────────► (read only copy)     │
//! │                  then ───► clear() ─────────────► items.clear()        │
//! │                                                                         │
//! │  View Basket ────────────► list_all() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Positions
//! Positions are the 1-based row numbers shown to the operator, not stable
//! keys. Deleting line 2 makes the old line 3 the new line 2. The same item
//! code may appear on several independent lines.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Item, ItemRecord};

/// Ordered basket of validated items.
#[derive(Debug, Clone, Default)]
pub struct BasketStore {
    items: Vec<Item>,
}

impl BasketStore {
    /// Creates an empty basket.
    pub fn new() -> Self {
        BasketStore { items: Vec::new() }
    }

    /// Validates and appends a new line.
    ///
    /// ## Returns
    /// - `Ok(&Item)` - the appended item, with its discounted price
    /// - `Err(ValidationError)` - naming the offending field; the basket is
    ///   unchanged
    pub fn add(
        &mut self,
        item_code: &str,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        quantity: i64,
    ) -> Result<&Item, ValidationError> {
        let item = Item::new(item_code, cost, sale_price, discount_percent, quantity)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Read-only view of every line in display order.
    pub fn list_all(&self) -> &[Item] {
        &self.items
    }

    /// Returns the item at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&Item> {
        let index = position.checked_sub(1)?;
        self.items.get(index)
    }

    /// Removes the line at a 1-based position.
    ///
    /// Returns `false` and leaves the basket untouched when the position is
    /// outside `[1, len]`.
    pub fn delete_at(&mut self, position: usize) -> bool {
        match self.index_of(position) {
            Ok(index) => {
                self.items.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Replaces the line at a 1-based position with a freshly validated item.
    ///
    /// The item code is kept; prices, discount and quantity are replaced.
    /// Returns `false` on an out-of-range position or a validation failure.
    /// Use [`BasketStore::try_update_at`] to learn which.
    pub fn update_at(
        &mut self,
        position: usize,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        quantity: i64,
    ) -> bool {
        self.try_update_at(position, cost, sale_price, discount_percent, quantity)
            .is_ok()
    }

    /// Same as [`BasketStore::update_at`] but reports why it failed.
    ///
    /// ## Errors
    /// - `CoreError::PositionOutOfRange`
    /// - `CoreError::Validation` naming the offending field
    pub fn try_update_at(
        &mut self,
        position: usize,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        quantity: i64,
    ) -> CoreResult<&Item> {
        let index = self.index_of(position)?;
        let replacement = self.items[index].with_prices(cost, sale_price, discount_percent, quantity)?;
        self.items[index] = replacement;
        Ok(&self.items[index])
    }

    /// Detached copies of every line, used to build a bill.
    pub fn snapshot(&self) -> Vec<ItemRecord> {
        self.items.iter().map(Item::to_record).collect()
    }

    /// Empties the basket.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every line total.
    pub fn total(&self) -> f64 {
        self.items.iter().map(Item::line_total).sum()
    }

    fn index_of(&self, position: usize) -> CoreResult<usize> {
        if position == 0 || position > self.items.len() {
            return Err(CoreError::PositionOutOfRange {
                position,
                len: self.items.len(),
            });
        }
        Ok(position - 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
