//! # Bill Files
//!
//! Dump and reload of the bill ledger.
//!
//! ## File Formats
//! ```text
//! Bills/bills.csv
//!   BillID,Date,GrandTotal
//!   1001,2024-05-01,27
//!
//! Bills/bill_items_1001.csv
//!   ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Quantity
//!   Cake124,10.00,15.00,10,13.50,2
//! ```
//!
//! ## Reload Rules
//! - Items are rebuilt through item validation; the discounted price is
//!   recomputed and a stored value that disagrees is only logged
//! - The stored grand total is kept as the bill's total
//! - Bill ids must be strictly increasing
//! - Any bad row, or a listed bill without an item file, fails the whole read

use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, warn};

use till_core::pricing::{approx_eq, format_amount, format_plain};
use till_core::{Bill, BillId, Item, ItemRecord, AMOUNT_TOLERANCE};

use super::{ensure_dir, read_table, write_table, Row};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Columns of `bills.csv`.
pub const BILL_HEADER: [&str; 3] = ["BillID", "Date", "GrandTotal"];

/// Columns of `bill_items_<id>.csv`.
pub const ITEM_HEADER: [&str; 6] = [
    "ItemCode",
    "Cost",
    "SalePrice",
    "Discount",
    "DiscountedPrice",
    "Quantity",
];

/// Date format of the Date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest difference between a stored grand total and the sum of its
/// reloaded lines that is not reported.
const TOTAL_TOLERANCE: f64 = 0.01;

/// Reader and writer for the bill files.
#[derive(Debug, Clone)]
pub struct BillFiles {
    config: StoreConfig,
}

impl BillFiles {
    pub fn new(config: StoreConfig) -> Self {
        BillFiles { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Overwrites `bills.csv` and every bill's item file.
    pub fn write_all(&self, bills: &[Bill]) -> StoreResult<()> {
        let dir = self.config.bills_path();
        ensure_dir(&dir)?;

        write_table(
            &self.config.bill_header_path(),
            &BILL_HEADER,
            bills.iter().map(bill_row),
        )?;

        for bill in bills {
            write_table(
                &self.config.bill_items_path(bill.id()),
                &ITEM_HEADER,
                bill.items().iter().map(item_row),
            )?;
        }

        debug!(bills = bills.len(), dir = %dir.display(), "Bill files written");
        Ok(())
    }

    /// Reads every stored bill in file order.
    ///
    /// A missing `bills.csv` is an empty ledger.
    pub fn read_all(&self) -> StoreResult<Vec<Bill>> {
        let path = self.config.bill_header_path();

        let Some(rows) = read_table(&path, &BILL_HEADER)? else {
            debug!(path = %path.display(), "No bill file, starting empty");
            return Ok(Vec::new());
        };

        let mut bills: Vec<Bill> = Vec::with_capacity(rows.len());

        for row in &rows {
            let bill_id: BillId = row.parse(&path, 0, "BillID")?;

            if let Some(previous) = bills.last() {
                if bill_id <= previous.id() {
                    return Err(StoreError::malformed(
                        &path,
                        row.line,
                        format!("bill id {} does not follow {}", bill_id, previous.id()),
                    ));
                }
            }

            let created_on = NaiveDate::parse_from_str(row.field(1), DATE_FORMAT).map_err(|_| {
                StoreError::malformed(&path, row.line, format!("invalid Date '{}'", row.field(1)))
            })?;

            let grand_total: f64 = row.parse(&path, 2, "GrandTotal")?;
            if !grand_total.is_finite() {
                return Err(StoreError::malformed(
                    &path,
                    row.line,
                    format!("invalid GrandTotal '{}'", row.field(2)),
                ));
            }

            let items = self.read_items(bill_id)?;
            let bill = Bill::restore(bill_id, created_on, items, grand_total).map_err(|_| {
                StoreError::malformed(
                    self.config.bill_items_path(bill_id),
                    1,
                    format!("bill #{} has no items", bill_id),
                )
            })?;

            if !approx_eq(bill.grand_total(), bill.computed_total(), TOTAL_TOLERANCE) {
                warn!(
                    bill_id,
                    stored = bill.grand_total(),
                    computed = bill.computed_total(),
                    "Stored grand total differs from item lines, keeping stored value"
                );
            }

            bills.push(bill);
        }

        debug!(bills = bills.len(), "Bill files read");
        Ok(bills)
    }

    fn read_items(&self, bill_id: BillId) -> StoreResult<Vec<ItemRecord>> {
        let path = self.config.bill_items_path(bill_id);

        let rows = read_table(&path, &ITEM_HEADER)?.ok_or_else(|| {
            StoreError::malformed(&path, 0, format!("item file for bill #{} is missing", bill_id))
        })?;

        rows.iter().map(|row| parse_item(&path, row)).collect()
    }
}

fn bill_row(bill: &Bill) -> Vec<String> {
    vec![
        bill.id().to_string(),
        bill.created_on().format(DATE_FORMAT).to_string(),
        format_plain(bill.grand_total()),
    ]
}

fn item_row(record: &ItemRecord) -> Vec<String> {
    vec![
        record.item_code.clone(),
        format_amount(record.cost),
        format_amount(record.sale_price),
        format_plain(record.discount_percent),
        format_amount(record.discounted_price),
        record.quantity.to_string(),
    ]
}

fn parse_item(path: &Path, row: &Row) -> StoreResult<ItemRecord> {
    let cost: f64 = row.parse(path, 1, "Cost")?;
    let sale_price: f64 = row.parse(path, 2, "SalePrice")?;
    let discount: f64 = row.parse(path, 3, "Discount")?;
    let stored_discounted: f64 = row.parse(path, 4, "DiscountedPrice")?;
    let quantity: i64 = row.parse(path, 5, "Quantity")?;

    let item = Item::new(row.field(0), cost, sale_price, discount, quantity)
        .map_err(|e| StoreError::malformed(path, row.line, e.to_string()))?;

    if !approx_eq(stored_discounted, item.discounted_price(), AMOUNT_TOLERANCE) {
        warn!(
            path = %path.display(),
            line = row.line,
            stored = stored_discounted,
            computed = item.discounted_price(),
            "Stored discounted price disagrees, using computed value"
        );
    }

    Ok(item.to_record())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn bill(id: BillId, items: &[(&str, f64, f64, f64, i64)]) -> Bill {
        let records = items
            .iter()
            .map(|(code, cost, sale, disc, qty)| {
                Item::new(*code, *cost, *sale, *disc, *qty).unwrap().to_record()
            })
            .collect();
        Bill::new(id, date(), records).unwrap()
    }

    fn setup() -> (TempDir, BillFiles) {
        let dir = TempDir::new().unwrap();
        let files = BillFiles::new(StoreConfig::new(dir.path()));
        (dir, files)
    }

    #[test]
    fn test_write_layout() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();

        let header = fs::read_to_string(files.config().bill_header_path()).unwrap();
        assert_eq!(header, "BillID,Date,GrandTotal\n1001,2024-05-01,27\n");

        let items = fs::read_to_string(files.config().bill_items_path(1001)).unwrap();
        assert_eq!(
            items,
            "ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Quantity\n\
             Cake124,10.00,15.00,10,13.50,2\n"
        );
    }

    #[test]
    fn test_read_back() {
        let (_dir, files) = setup();
        let written = vec![
            bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)]),
            bill(
                1002,
                &[("Lemon_01", 3.0, 5.0, 5.0, 1), ("Bread", 1.0, 2.0, 0.0, 3)],
            ),
        ];
        files.write_all(&written).unwrap();

        let read = files.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].id(), 1002);
        assert_eq!(read[1].item_count(), 2);
        assert_eq!(read[1].items()[0].item_code, "Lemon_01");
        assert!(approx_eq(read[1].grand_total(), 10.75, 1e-9));
        assert_eq!(read[0].created_on(), date());
    }

    #[test]
    fn test_missing_header_file_is_empty() {
        let (_dir, files) = setup();
        assert!(files.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_item_file_is_malformed() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();
        fs::remove_file(files.config().bill_items_path(1001)).unwrap();

        let err = files.read_all().unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_duplicate_id_is_malformed() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();
        fs::write(
            files.config().bill_header_path(),
            "BillID,Date,GrandTotal\n1001,2024-05-01,27\n1001,2024-05-01,27\n",
        )
        .unwrap();

        let err = files.read_all().unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage { line: 3, .. }));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();
        fs::write(
            files.config().bill_header_path(),
            "BillID,Date,GrandTotal\n1001,01/05/2024,27\n",
        )
        .unwrap();

        let err = files.read_all().unwrap_err();
        assert!(err.to_string().contains("invalid Date '01/05/2024'"));
    }

    #[test]
    fn test_invalid_stored_item_is_malformed() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();
        fs::write(
            files.config().bill_items_path(1001),
            "ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Quantity\n\
             Cake124,10.00,15.00,150,0.00,2\n",
        )
        .unwrap();

        let err = files.read_all().unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage { line: 2, .. }));
    }

    #[test]
    fn test_stored_total_is_kept() {
        let (_dir, files) = setup();
        files
            .write_all(&[bill(1001, &[("Cake124", 10.0, 15.0, 10.0, 2)])])
            .unwrap();
        fs::write(
            files.config().bill_header_path(),
            "BillID,Date,GrandTotal\n1001,2024-05-01,30\n",
        )
        .unwrap();

        let read = files.read_all().unwrap();
        assert_eq!(read[0].grand_total(), 30.0);
        assert!(approx_eq(read[0].computed_total(), 27.0, 1e-9));
    }
}
