//! # Basket Commands
//!
//! Add, update and delete basket lines.
//!
//! ## Basket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│  Lines   │────►│   Bill   │                        │
//! │  │  Basket  │     │          │     │ Created  │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │       ▲                │                 │                              │
//! │       │           add_item          generate_bill                      │
//! │       │           update_item       (bill.rs)                          │
//! │       │           delete_item            │                              │
//! │       │                                  │                              │
//! │       └──────────── basket cleared ◄─────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions are 1-based and follow the display order; deleting a line
//! renumbers every line after it.

use tracing::debug;

use till_core::{CoreError, Item, ItemRecord};

use crate::error::AppError;
use crate::state::Session;

/// Prices and quantity entered for a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrices {
    pub cost: f64,
    pub sale_price: f64,
    pub discount_percent: f64,
    pub quantity: i64,
}

/// Basket contents and total, as the "View basket" screen shows them.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketView {
    pub items: Vec<ItemRecord>,
    pub total: f64,
}

/// Returns the current basket.
pub fn view_basket(session: &Session) -> BasketView {
    BasketView {
        items: session.basket.snapshot(),
        total: session.basket.total(),
    }
}

/// Validates and appends a line.
///
/// ## Errors
/// `VALIDATION_ERROR` naming the field; the basket is unchanged.
pub fn add_item(session: &mut Session, item_code: &str, prices: LinePrices) -> Result<Item, AppError> {
    let item = session
        .basket
        .add(
            item_code,
            prices.cost,
            prices.sale_price,
            prices.discount_percent,
            prices.quantity,
        )?
        .clone();

    debug!(
        item_code = item.item_code(),
        lines = session.basket.len(),
        "Item added"
    );
    Ok(item)
}

/// Replaces the prices and quantity of the line at `position`.
///
/// ## Errors
/// - `NOT_FOUND` - no line at this position
/// - `VALIDATION_ERROR` - a new value breaks a field rule
pub fn update_item(
    session: &mut Session,
    position: usize,
    prices: LinePrices,
) -> Result<Item, AppError> {
    let item = session
        .basket
        .try_update_at(
            position,
            prices.cost,
            prices.sale_price,
            prices.discount_percent,
            prices.quantity,
        )?
        .clone();

    debug!(position, item_code = item.item_code(), "Item updated");
    Ok(item)
}

/// Removes the line at `position` and returns it.
///
/// ## Errors
/// `NOT_FOUND` - no line at this position; the basket is unchanged.
pub fn delete_item(session: &mut Session, position: usize) -> Result<Item, AppError> {
    let removed = session
        .basket
        .get(position)
        .cloned()
        .ok_or(CoreError::PositionOutOfRange {
            position,
            len: session.basket.len(),
        })?;

    if !session.basket.delete_at(position) {
        return Err(AppError::internal("basket line vanished during delete"));
    }

    debug!(position, item_code = removed.item_code(), "Item deleted");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;

    fn prices(cost: f64, sale_price: f64, discount_percent: f64, quantity: i64) -> LinePrices {
        LinePrices {
            cost,
            sale_price,
            discount_percent,
            quantity,
        }
    }

    fn session() -> Session {
        Session::new(AppConfig::default())
    }

    #[test]
    fn test_add_and_view() {
        let mut session = session();
        let item = add_item(&mut session, "Cake124", prices(10.0, 15.0, 10.0, 2)).unwrap();

        assert!((item.discounted_price() - 13.5).abs() < 1e-9);

        let view = view_basket(&session);
        assert_eq!(view.items.len(), 1);
        assert!((view.total - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_rejects_bad_code() {
        let mut session = session();
        let err = add_item(&mut session, "12abc", prices(1.0, 2.0, 0.0, 1)).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(session.basket.is_empty());
    }

    #[test]
    fn test_update_keeps_code() {
        let mut session = session();
        add_item(&mut session, "Lemon_01", prices(3.0, 5.0, 5.0, 1)).unwrap();

        let item = update_item(&mut session, 1, prices(3.0, 6.0, 50.0, 4)).unwrap();
        assert_eq!(item.item_code(), "Lemon_01");
        assert!((item.discounted_price() - 3.0).abs() < 1e-9);
        assert_eq!(item.quantity(), 4);
    }

    #[test]
    fn test_update_errors() {
        let mut session = session();
        add_item(&mut session, "Lemon_01", prices(3.0, 5.0, 5.0, 1)).unwrap();

        let err = update_item(&mut session, 3, prices(3.0, 5.0, 5.0, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_item(&mut session, 1, prices(3.0, 5.0, 5.0, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(session.basket.get(1).map(Item::quantity), Some(1));
    }

    #[test]
    fn test_delete_renumbers() {
        let mut session = session();
        add_item(&mut session, "Cake124", prices(10.0, 15.0, 10.0, 2)).unwrap();
        add_item(&mut session, "Lemon_01", prices(3.0, 5.0, 5.0, 1)).unwrap();

        let removed = delete_item(&mut session, 1).unwrap();
        assert_eq!(removed.item_code(), "Cake124");
        assert_eq!(session.basket.get(1).map(Item::item_code), Some("Lemon_01"));
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut session = session();
        add_item(&mut session, "Cake124", prices(10.0, 15.0, 10.0, 2)).unwrap();
        add_item(&mut session, "Lemon_01", prices(3.0, 5.0, 5.0, 1)).unwrap();

        let err = delete_item(&mut session, 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Line 5 does not exist (basket has 2 items)");
        assert_eq!(session.basket.len(), 2);
    }
}
