//! # Bill Commands
//!
//! Bill generation and lookup.
//!
//! ## Generate Bill Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate_bill(session)                                                 │
//! │       │                                                                 │
//! │       ├── basket empty? ──► NOTHING_TO_DO, nothing changes              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.create_bill(basket.snapshot())                                  │
//! │       │   id allocated, bill appended, files rewritten                  │
//! │       ▼                                                                 │
//! │  basket.clear()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GeneratedBill { bill, save_error }                                     │
//! │       save_error set when the files could not be written; the bill     │
//! │       still exists in this session                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use till_core::{Bill, BillId, CoreError};
use till_store::StoreError;

use crate::error::AppError;
use crate::state::Session;

/// Outcome of [`generate_bill`].
#[derive(Debug)]
pub struct GeneratedBill {
    pub bill: Bill,
    /// Files could not be written (the bill is still in the ledger).
    pub save_error: Option<AppError>,
}

/// Freezes the basket into a new bill and clears the basket.
///
/// ## Errors
/// - `NOTHING_TO_DO` when the basket is empty; no id is consumed
/// - `MALFORMED_STORAGE` when stored bills failed to load; the basket is
///   kept and no file is written
pub fn generate_bill(session: &mut Session) -> Result<GeneratedBill, AppError> {
    if session.basket.is_empty() {
        return Err(CoreError::EmptyBasket.into());
    }

    let created = session.ledger.create_bill(session.basket.snapshot())?;
    session.basket.clear();

    info!(bill_id = created.bill.id(), "Basket billed and cleared");

    Ok(GeneratedBill {
        bill: created.bill,
        save_error: created.persist_error.map(AppError::from),
    })
}

/// Looks up a bill by id.
///
/// ## Errors
/// `NOT_FOUND` when no bill has this id.
pub fn find_bill(session: &Session, bill_id: BillId) -> Result<&Bill, AppError> {
    session
        .ledger
        .find_by_id(bill_id)
        .ok_or_else(|| StoreError::BillNotFound(bill_id).into())
}

/// All bills in creation order.
pub fn list_bills(session: &Session) -> &[Bill] {
    session.ledger.bills()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::basket::{add_item, LinePrices};
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        Session::new(AppConfig::default().with_data_dir(Some(dir.path().to_path_buf())))
    }

    fn cake() -> LinePrices {
        LinePrices {
            cost: 10.0,
            sale_price: 15.0,
            discount_percent: 10.0,
            quantity: 2,
        }
    }

    #[test]
    fn test_generate_clears_basket() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        add_item(&mut session, "Cake124", cake()).unwrap();

        let generated = generate_bill(&mut session).unwrap();

        assert_eq!(generated.bill.id(), 1001);
        assert!((generated.bill.grand_total() - 27.0).abs() < 1e-9);
        assert!(generated.save_error.is_none());
        assert!(session.basket.is_empty());
        assert!(dir.path().join("Bills/bill_items_1001.csv").exists());
    }

    #[test]
    fn test_generate_from_empty_basket() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        let err = generate_bill(&mut session).unwrap_err();
        assert_eq!(err.code, ErrorCode::NothingToDo);
        assert_eq!(session.ledger.next_id(), 1001);
    }

    #[test]
    fn test_save_failure_still_clears_basket() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Bills"), "in the way").unwrap();

        let mut session = session_in(&dir);
        add_item(&mut session, "Cake124", cake()).unwrap();

        let generated = generate_bill(&mut session).unwrap();
        assert_eq!(
            generated.save_error.map(|e| e.code),
            Some(ErrorCode::StorageError)
        );
        assert!(session.basket.is_empty());
        assert!(find_bill(&session, 1001).is_ok());
    }

    #[test]
    fn test_generate_refused_after_failed_load() {
        let dir = TempDir::new().unwrap();
        let bills = dir.path().join("Bills");
        std::fs::create_dir_all(&bills).unwrap();
        std::fs::write(bills.join("bills.csv"), "BillID,Date,GrandTotal\n1001,2024-05-01,x\n").unwrap();

        let config = AppConfig::default().with_data_dir(Some(dir.path().to_path_buf()));
        let (mut session, _) = Session::open(config);
        add_item(&mut session, "Cake124", cake()).unwrap();

        let err = generate_bill(&mut session).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedStorage);
        assert_eq!(session.basket.len(), 1);
        assert_eq!(
            std::fs::read_to_string(bills.join("bills.csv")).unwrap(),
            "BillID,Date,GrandTotal\n1001,2024-05-01,x\n"
        );
        assert!(!bills.join("bill_items_1001.csv").exists());
    }

    #[test]
    fn test_find_bill() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        add_item(&mut session, "Cake124", cake()).unwrap();
        generate_bill(&mut session).unwrap();

        assert_eq!(find_bill(&session, 1001).unwrap().item_count(), 1);

        let err = find_bill(&session, 1002).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(list_bills(&session).len(), 1);
    }
}
