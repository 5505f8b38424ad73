//! # Bill Ledger
//!
//! The ordered, append-only list of bills and the id counter.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillLedger::new(config)      empty, next id 1001                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reload()                     replace contents with files on disk       │
//! │       │                       next id = max stored id + 1               │
//! │       ▼                                                                 │
//! │  create_bill(snapshot)        append, advance id, dump all files        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_by_id(id)               linear scan                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bills are never modified or removed once appended. A failed dump does not
//! undo the append; the caller gets the bill and the error together.
//!
//! A failed reload makes the ledger read-only. It stays empty, creating a
//! bill returns [`StoreError::LedgerUnavailable`] and nothing on disk is
//! touched until a later reload succeeds.

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use till_core::{Bill, BillId, ItemRecord, FIRST_BILL_ID};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::repository::BillFiles;

/// Outcome of [`BillLedger::create_bill`].
#[derive(Debug)]
pub struct CreatedBill {
    /// The appended bill.
    pub bill: Bill,

    /// Set when the bill is in the ledger but the files could not be written.
    pub persist_error: Option<StoreError>,
}

impl CreatedBill {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Append-only bill store backed by flat files.
#[derive(Debug)]
pub struct BillLedger {
    bills: Vec<Bill>,
    next_id: BillId,
    files: BillFiles,
    load_error: Option<String>,
}

impl BillLedger {
    /// Creates an empty ledger. Nothing is read until [`reload`](Self::reload).
    pub fn new(config: StoreConfig) -> Self {
        BillLedger {
            bills: Vec::new(),
            next_id: FIRST_BILL_ID,
            files: BillFiles::new(config),
            load_error: None,
        }
    }

    /// Freezes a basket snapshot into a new bill dated today.
    ///
    /// ## Errors
    /// - `LedgerUnavailable` - the last reload failed; no id is consumed
    /// - `Core(EmptyBasket)` - snapshot is empty; no id is consumed
    ///
    /// A write failure is returned inside [`CreatedBill`], not as `Err`.
    pub fn create_bill(&mut self, snapshot: Vec<ItemRecord>) -> StoreResult<CreatedBill> {
        self.create_bill_on(snapshot, Local::now().date_naive())
    }

    /// Same as [`create_bill`](Self::create_bill) with an explicit date.
    pub fn create_bill_on(
        &mut self,
        snapshot: Vec<ItemRecord>,
        created_on: NaiveDate,
    ) -> StoreResult<CreatedBill> {
        self.ensure_writable()?;
        let bill = Bill::new(self.next_id, created_on, snapshot)?;

        self.bills.push(bill.clone());
        self.next_id += 1;

        info!(
            bill_id = bill.id(),
            items = bill.item_count(),
            grand_total = bill.grand_total(),
            "Bill created"
        );

        let persist_error = self.persist().err();
        if let Some(err) = &persist_error {
            error!(bill_id = bill.id(), error = %err, "Bill created but not saved");
        }

        Ok(CreatedBill {
            bill,
            persist_error,
        })
    }

    pub fn find_by_id(&self, bill_id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.id() == bill_id)
    }

    /// Writes every bill, replacing the previous files.
    pub fn persist(&self) -> StoreResult<()> {
        self.ensure_writable()?;
        self.files.write_all(&self.bills)
    }

    /// Why the last reload failed, while the ledger is read-only.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_writable(&self) -> bool {
        self.load_error.is_none()
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        match &self.load_error {
            Some(reason) => Err(StoreError::LedgerUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Replaces the in-memory bills with the stored ones.
    ///
    /// ## Returns
    /// The number of bills loaded; `0` when nothing is stored yet.
    ///
    /// ## Errors
    /// Any malformed or unreadable file. The ledger is left empty and
    /// read-only until a reload succeeds.
    pub fn reload(&mut self) -> StoreResult<usize> {
        self.bills.clear();
        self.next_id = FIRST_BILL_ID;

        match self.files.read_all() {
            Ok(bills) => {
                if let Some(last) = bills.last() {
                    self.next_id = last.id() + 1;
                }
                self.bills = bills;
                self.load_error = None;
                info!(
                    bills = self.bills.len(),
                    next_id = self.next_id,
                    "Bills loaded"
                );
                Ok(self.bills.len())
            }
            Err(err) => {
                error!(error = %err, "Failed to load bills, ledger is read-only");
                self.load_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// All bills in creation order.
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn last(&self) -> Option<&Bill> {
        self.bills.last()
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    /// Id the next created bill will get.
    pub fn next_id(&self) -> BillId {
        self.next_id
    }

    pub fn config(&self) -> &StoreConfig {
        self.files.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use till_core::{BasketStore, CoreError};

    fn setup() -> (TempDir, BillLedger) {
        let dir = TempDir::new().unwrap();
        let ledger = BillLedger::new(StoreConfig::new(dir.path()));
        (dir, ledger)
    }

    fn snapshot(code: &str, qty: i64) -> Vec<ItemRecord> {
        let mut basket = BasketStore::new();
        basket.add(code, 10.0, 15.0, 10.0, qty).unwrap();
        basket.snapshot()
    }

    #[test]
    fn test_ids_are_sequential() {
        let (_dir, mut ledger) = setup();

        let first = ledger.create_bill(snapshot("Cake124", 2)).unwrap();
        let second = ledger.create_bill(snapshot("Cake125", 1)).unwrap();

        assert_eq!(first.bill.id(), 1001);
        assert_eq!(second.bill.id(), 1002);
        assert!(first.is_persisted());
        assert_eq!(ledger.next_id(), 1003);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last().map(Bill::id), Some(1002));
    }

    #[test]
    fn test_empty_snapshot_consumes_no_id() {
        let (_dir, mut ledger) = setup();

        let err = ledger.create_bill(Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EmptyBasket)));
        assert!(ledger.is_empty());

        let created = ledger.create_bill(snapshot("Cake124", 1)).unwrap();
        assert_eq!(created.bill.id(), 1001);
    }

    #[test]
    fn test_find_by_id() {
        let (_dir, mut ledger) = setup();
        ledger.create_bill(snapshot("Cake124", 2)).unwrap();

        assert_eq!(ledger.find_by_id(1001).map(Bill::item_count), Some(1));
        assert!(ledger.find_by_id(1009).is_none());
    }

    #[test]
    fn test_reload_continues_ids() {
        let (dir, mut ledger) = setup();
        ledger.create_bill(snapshot("Cake124", 2)).unwrap();
        ledger.create_bill(snapshot("Cake125", 1)).unwrap();

        let mut reopened = BillLedger::new(StoreConfig::new(dir.path()));
        assert_eq!(reopened.reload().unwrap(), 2);
        assert_eq!(reopened.next_id(), 1003);

        let created = reopened.create_bill(snapshot("Cake126", 1)).unwrap();
        assert_eq!(created.bill.id(), 1003);
    }

    #[test]
    fn test_reload_without_files_is_empty() {
        let (_dir, mut ledger) = setup();
        assert_eq!(ledger.reload().unwrap(), 0);
        assert_eq!(ledger.next_id(), FIRST_BILL_ID);
    }

    #[test]
    fn test_failed_reload_leaves_ledger_empty() {
        let (dir, mut ledger) = setup();
        ledger.create_bill(snapshot("Cake124", 2)).unwrap();

        fs::write(
            ledger.config().bill_header_path(),
            "BillID,Date,GrandTotal\nabc,2024-05-01,27\n",
        )
        .unwrap();

        let mut reopened = BillLedger::new(StoreConfig::new(dir.path()));
        assert!(reopened.reload().is_err());
        assert!(reopened.is_empty());
        assert!(!reopened.is_writable());
        assert!(reopened.load_error().unwrap().contains("abc"));
    }

    #[test]
    fn test_failed_reload_blocks_new_bills() {
        let (dir, mut ledger) = setup();
        ledger.create_bill(snapshot("Cake124", 2)).unwrap();
        ledger.create_bill(snapshot("Cake125", 1)).unwrap();

        let header = ledger.config().bill_header_path();
        let stored = fs::read_to_string(&header).unwrap();
        let broken = stored.replace("1002,", "1002,not-a-date-");
        fs::write(&header, &broken).unwrap();
        let items_1001 = fs::read_to_string(ledger.config().bill_items_path(1001)).unwrap();

        let mut reopened = BillLedger::new(StoreConfig::new(dir.path()));
        assert!(reopened.reload().is_err());

        let err = reopened.create_bill(snapshot("Cake126", 1)).unwrap_err();
        assert!(matches!(err, StoreError::LedgerUnavailable { .. }));
        assert!(matches!(reopened.persist(), Err(StoreError::LedgerUnavailable { .. })));
        assert_eq!(reopened.next_id(), FIRST_BILL_ID);
        assert!(reopened.is_empty());

        assert_eq!(fs::read_to_string(&header).unwrap(), broken);
        assert_eq!(
            fs::read_to_string(ledger.config().bill_items_path(1001)).unwrap(),
            items_1001
        );
    }

    #[test]
    fn test_repaired_files_unlock_the_ledger() {
        let (dir, mut ledger) = setup();
        ledger.create_bill(snapshot("Cake124", 2)).unwrap();

        let header = ledger.config().bill_header_path();
        let stored = fs::read_to_string(&header).unwrap();
        fs::write(&header, "BillID,Date,GrandTotal\nabc,2024-05-01,27\n").unwrap();

        let mut reopened = BillLedger::new(StoreConfig::new(dir.path()));
        assert!(reopened.reload().is_err());

        fs::write(&header, stored).unwrap();
        assert_eq!(reopened.reload().unwrap(), 1);
        assert!(reopened.is_writable());

        let created = reopened.create_bill(snapshot("Cake125", 1)).unwrap();
        assert_eq!(created.bill.id(), 1002);
    }

    #[test]
    fn test_persist_failure_keeps_bill() {
        let dir = TempDir::new().unwrap();
        // A plain file where the bills directory should be.
        fs::write(dir.path().join("Bills"), "not a directory").unwrap();

        let mut ledger = BillLedger::new(StoreConfig::new(dir.path()));
        let created = ledger.create_bill(snapshot("Cake124", 2)).unwrap();

        assert!(!created.is_persisted());
        assert!(created.persist_error.unwrap().is_persistence());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.next_id(), 1002);
    }
}
