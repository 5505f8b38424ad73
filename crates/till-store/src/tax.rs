//! # Tax Transaction Files
//!
//! Export of billed items as checksummed lines for the tax department, and
//! the matching import-side verification.
//!
//! ## Export
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  export_bill(ledger, 1001)  ──►  TaxFiles/ttf_1001.csv                  │
//! │  export_all(ledger)         ──►  TaxFiles/ttf_all_bills.csv             │
//! │                                                                         │
//! │  ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Checksum             │
//! │  Cake124,10.00,15.00,10,13.50,24                                        │
//! │  Lemon_01,3.00,5.00,5,4.75,20                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both modes write the same line format, only the grouping differs. Each
//! export overwrites its file.
//!
//! ## Verify
//! Reads a tax file back, recomputes the discounted price and the checksum
//! from the parsed values and reports per-line unit profit
//! (`discountedPrice - cost`). No tax rate is applied.
//!
//! ## Cleanup
//! ```text
//!  verify(path) ──► TaxFileReport ──► remove_invalid()      drop bad lines
//!                        │        ──► remove_zero_profit()  drop profit == 0
//!                        │        ──► remove_line(n)        drop one bad line
//!                        │        ──► edit_line(n, edit)    new values + checksum
//!                        ▼
//!                   save(report) ──► rewrite the file
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use till_core::pricing::{approx_eq, discounted_price, format_amount};
use till_core::validation::{validate_item_code, validate_price};
use till_core::{checksum, transaction_fields, transaction_line, Bill, BillId, CoreError, Item, TaxLine};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::ledger::BillLedger;
use crate::repository::{ensure_dir, read_table, write_table, Row};

/// Columns of a tax transaction file.
pub const TAX_HEADER: [&str; 6] = [
    "ItemCode",
    "Cost",
    "SalePrice",
    "Discount",
    "DiscountedPrice",
    "Checksum",
];

/// Result of writing one tax file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxExport {
    pub path: PathBuf,
    /// Bills covered by the file.
    pub bills: usize,
    /// Item lines written.
    pub lines: usize,
}

/// Writes and verifies tax transaction files.
#[derive(Debug, Clone)]
pub struct TaxExporter {
    config: StoreConfig,
}

impl TaxExporter {
    pub fn new(config: StoreConfig) -> Self {
        TaxExporter { config }
    }

    /// Writes `ttf_<id>.csv` for one bill.
    ///
    /// ## Errors
    /// - `EmptyLedger` - no bills at all
    /// - `BillNotFound` - no bill with this id
    pub fn export_bill(&self, ledger: &BillLedger, bill_id: BillId) -> StoreResult<TaxExport> {
        if ledger.is_empty() {
            return Err(StoreError::EmptyLedger);
        }

        let bill = ledger
            .find_by_id(bill_id)
            .ok_or(StoreError::BillNotFound(bill_id))?;

        self.write(self.config.tax_bill_path(bill_id), std::slice::from_ref(bill))
    }

    /// Writes `ttf_all_bills.csv` covering every bill in ledger order.
    ///
    /// ## Errors
    /// - `EmptyLedger` - no bills at all
    pub fn export_all(&self, ledger: &BillLedger) -> StoreResult<TaxExport> {
        if ledger.is_empty() {
            return Err(StoreError::EmptyLedger);
        }

        self.write(self.config.tax_all_path(), ledger.bills())
    }

    fn write(&self, path: PathBuf, bills: &[Bill]) -> StoreResult<TaxExport> {
        ensure_dir(&self.config.tax_path())?;

        let lines = lines_for(bills);
        write_table(&path, &TAX_HEADER, lines.iter().map(TaxLine::to_row))?;

        info!(
            path = %path.display(),
            bills = bills.len(),
            lines = lines.len(),
            "Tax file written"
        );

        Ok(TaxExport {
            path,
            bills: bills.len(),
            lines: lines.len(),
        })
    }

    /// Checks a tax file line by line.
    ///
    /// ## Errors
    /// - `Persistence` - file missing or unreadable
    /// - `MalformedStorage` - bad header, wrong column count, unparseable
    ///   number, or no lines at all
    ///
    /// Checksum and value problems do not fail the call; they are reported
    /// per line.
    pub fn verify(&self, path: &Path) -> StoreResult<TaxFileReport> {
        let rows = read_table(path, &TAX_HEADER)?.ok_or_else(|| {
            StoreError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "tax file not found"),
            )
        })?;

        if rows.is_empty() {
            return Err(StoreError::malformed(path, 1, "no transaction lines"));
        }

        let lines = rows
            .iter()
            .map(|row| verify_row(path, row))
            .collect::<StoreResult<Vec<_>>>()?;

        let report = TaxFileReport::new(path.to_path_buf(), lines);
        if report.invalid_count > 0 {
            warn!(
                path = %path.display(),
                invalid = report.invalid_count,
                "Tax file has invalid lines"
            );
        }

        Ok(report)
    }

    /// Rewrites the report's file with its remaining lines.
    ///
    /// Lines keep the checksum and discounted price they were read with;
    /// edited lines carry the values produced by
    /// [`TaxFileReport::edit_line`]. Returns the number of lines written.
    pub fn save(&self, report: &TaxFileReport) -> StoreResult<usize> {
        write_table(
            &report.path,
            &TAX_HEADER,
            report.lines.iter().map(VerifiedLine::to_row),
        )?;

        info!(
            path = %report.path.display(),
            lines = report.lines.len(),
            "Tax file rewritten"
        );
        Ok(report.lines.len())
    }
}

/// Tax lines for the given bills, in bill then item order.
pub fn lines_for(bills: &[Bill]) -> Vec<TaxLine> {
    bills
        .iter()
        .flat_map(|bill| bill.items().iter().map(TaxLine::from_record))
        .collect()
}

// =============================================================================
// Verification
// =============================================================================

/// Something wrong with one tax line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineProblem {
    /// Stated checksum is not the one recomputed from the values.
    ChecksumMismatch { stated: String, expected: u32 },

    /// DiscountedPrice column disagrees with sale price and discount.
    DiscountedPriceMismatch { stated: f64, expected: f64 },

    /// Cost or sale price is negative or not a number.
    InvalidAmount { reason: String },

    /// Item code breaks the item code rule.
    InvalidItemCode { reason: String },
}

impl std::fmt::Display for LineProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineProblem::ChecksumMismatch { stated, expected } => {
                write!(f, "checksum {} should be {}", stated, expected)
            }
            LineProblem::DiscountedPriceMismatch { stated, expected } => write!(
                f,
                "discounted price {} should be {}",
                format_amount(*stated),
                format_amount(*expected)
            ),
            LineProblem::InvalidAmount { reason } | LineProblem::InvalidItemCode { reason } => {
                f.write_str(reason)
            }
        }
    }
}

/// One checked tax line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedLine {
    /// Line number in the file (header is line 1).
    pub line_number: u64,
    pub item_code: String,
    pub cost: f64,
    pub sale_price: f64,
    pub discount_percent: f64,
    /// Recomputed from sale price and discount.
    pub discounted_price: f64,
    /// As read from the DiscountedPrice column.
    pub stated_discounted_price: f64,
    pub stated_checksum: String,
    pub expected_checksum: u32,
    /// Unit profit, `discounted_price - cost`.
    pub profit: f64,
    pub problems: Vec<LineProblem>,
}

impl VerifiedLine {
    /// Recomputes the derived values of one line and collects its problems.
    fn check(
        line_number: u64,
        item_code: String,
        cost: f64,
        sale_price: f64,
        discount_percent: f64,
        stated_discounted_price: f64,
        stated_checksum: String,
    ) -> Self {
        let discounted = discounted_price(sale_price, discount_percent);
        let expected_checksum = checksum(&transaction_line(
            &item_code,
            cost,
            sale_price,
            discount_percent,
            discounted,
        ));

        let mut problems = Vec::new();

        if stated_checksum.parse::<u32>().ok() != Some(expected_checksum) {
            problems.push(LineProblem::ChecksumMismatch {
                stated: stated_checksum.clone(),
                expected: expected_checksum,
            });
        }

        if format_amount(stated_discounted_price) != format_amount(discounted) {
            problems.push(LineProblem::DiscountedPriceMismatch {
                stated: stated_discounted_price,
                expected: discounted,
            });
        }

        for (field, value) in [("cost", cost), ("sale price", sale_price)] {
            if let Err(err) = validate_price(field, value) {
                problems.push(LineProblem::InvalidAmount {
                    reason: err.to_string(),
                });
            }
        }

        if let Err(err) = validate_item_code(&item_code) {
            problems.push(LineProblem::InvalidItemCode {
                reason: err.to_string(),
            });
        }

        VerifiedLine {
            line_number,
            item_code,
            cost,
            sale_price,
            discount_percent,
            discounted_price: discounted,
            stated_discounted_price,
            stated_checksum,
            expected_checksum,
            profit: discounted - cost,
            problems,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// True when the line makes no profit at all.
    pub fn is_zero_profit(&self) -> bool {
        approx_eq(self.profit, 0.0, 1e-9)
    }

    /// The file row, as it was read or last edited.
    fn to_row(&self) -> Vec<String> {
        let mut row = transaction_fields(
            &self.item_code,
            self.cost,
            self.sale_price,
            self.discount_percent,
            self.stated_discounted_price,
        )
        .to_vec();
        row.push(self.stated_checksum.clone());
        row
    }
}

/// Replacement values for one tax line.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxLineEdit {
    pub item_code: String,
    pub cost: f64,
    pub sale_price: f64,
    pub discount_percent: f64,
}

/// Outcome of [`TaxExporter::verify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFileReport {
    pub path: PathBuf,
    pub lines: Vec<VerifiedLine>,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Σ unit profit over every line, valid or not.
    pub total_profit: f64,
}

impl TaxFileReport {
    fn new(path: PathBuf, lines: Vec<VerifiedLine>) -> Self {
        let mut report = TaxFileReport {
            path,
            lines,
            valid_count: 0,
            invalid_count: 0,
            total_profit: 0.0,
        };
        report.recount();
        report
    }

    pub fn is_clean(&self) -> bool {
        self.invalid_count == 0
    }

    /// Looks up a line by its file line number.
    pub fn line(&self, line_number: u64) -> Option<&VerifiedLine> {
        self.lines.iter().find(|l| l.line_number == line_number)
    }

    /// Drops every line that failed verification. Returns how many went.
    pub fn remove_invalid(&mut self) -> usize {
        self.remove_where(|line| !line.is_valid())
    }

    /// Drops every line with zero unit profit. Returns how many went.
    pub fn remove_zero_profit(&mut self) -> usize {
        self.remove_where(VerifiedLine::is_zero_profit)
    }

    /// Drops a single line, which must have failed verification.
    ///
    /// ## Errors
    /// - `TaxLineNotFound` - no such line
    /// - `TaxLineIsValid` - the line passed verification and is kept
    pub fn remove_line(&mut self, line_number: u64) -> StoreResult<VerifiedLine> {
        let index = self.index_of(line_number)?;
        if self.lines[index].is_valid() {
            return Err(StoreError::TaxLineIsValid(line_number));
        }

        let removed = self.lines.remove(index);
        self.recount();
        Ok(removed)
    }

    /// Replaces a line's values and gives it a fresh checksum.
    ///
    /// The values go through item validation (discount included), cost and
    /// sale price are rounded to cents, and the discounted price is
    /// recomputed. The line keeps its line number.
    ///
    /// ## Errors
    /// - `TaxLineNotFound` - no such line
    /// - `Core(Validation)` - a value is invalid; the line is unchanged
    pub fn edit_line(&mut self, line_number: u64, edit: TaxLineEdit) -> StoreResult<&VerifiedLine> {
        let index = self.index_of(line_number)?;

        let item = Item::new(
            edit.item_code,
            edit.cost,
            edit.sale_price,
            edit.discount_percent,
            1,
        )
        .map_err(CoreError::from)?;
        let tax_line = TaxLine::from_record(&item.to_record());

        self.lines[index] = VerifiedLine::check(
            line_number,
            item.item_code().to_string(),
            item.cost(),
            item.sale_price(),
            item.discount_percent(),
            item.discounted_price(),
            tax_line.checksum.to_string(),
        );
        self.recount();
        Ok(&self.lines[index])
    }

    fn index_of(&self, line_number: u64) -> StoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.line_number == line_number)
            .ok_or(StoreError::TaxLineNotFound(line_number))
    }

    fn remove_where(&mut self, mut unwanted: impl FnMut(&VerifiedLine) -> bool) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !unwanted(line));
        self.recount();
        before - self.lines.len()
    }

    fn recount(&mut self) {
        self.valid_count = self.lines.iter().filter(|l| l.is_valid()).count();
        self.invalid_count = self.lines.len() - self.valid_count;
        self.total_profit = self.lines.iter().map(|l| l.profit).sum();
    }
}

fn verify_row(path: &Path, row: &Row) -> StoreResult<VerifiedLine> {
    let cost: f64 = row.parse(path, 1, "Cost")?;
    let sale_price: f64 = row.parse(path, 2, "SalePrice")?;
    let discount_percent: f64 = row.parse(path, 3, "Discount")?;
    let stated_discounted_price: f64 = row.parse(path, 4, "DiscountedPrice")?;

    Ok(VerifiedLine::check(
        row.line,
        row.field(0).to_string(),
        cost,
        sale_price,
        discount_percent,
        stated_discounted_price,
        row.field(5).to_string(),
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
