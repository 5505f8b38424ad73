//! # Tax File Commands
//!
//! Generate tax transaction files, check one back and clean it up.
//!
//! Cleanup works on the in-memory [`TaxFileReport`]; nothing reaches the
//! file until [`save_tax_file`].

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use till_core::BillId;
use till_store::{TaxExport, TaxFileReport, TaxLineEdit, VerifiedLine};

use crate::error::AppError;
use crate::state::Session;

/// Which bills go into the tax file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// `ttf_all_bills.csv`
    AllBills,
    /// `ttf_<id>.csv`
    Bill(BillId),
}

/// Writes a tax transaction file.
///
/// ## Errors
/// - `NOTHING_TO_DO` - no bills yet
/// - `NOT_FOUND` - unknown bill id
/// - `STORAGE_ERROR` - the file could not be written
pub fn export_tax_file(session: &Session, scope: ExportScope) -> Result<TaxExport, AppError> {
    let export = match scope {
        ExportScope::AllBills => session.exporter.export_all(&session.ledger)?,
        ExportScope::Bill(bill_id) => session.exporter.export_bill(&session.ledger, bill_id)?,
    };
    Ok(export)
}

/// Checks the checksums and values of a tax transaction file.
pub fn verify_tax_file(session: &Session, path: &Path) -> Result<TaxFileReport, AppError> {
    Ok(session.exporter.verify(path)?)
}

/// Which lines a bulk cleanup drops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cleanup {
    pub invalid: bool,
    pub zero_profit: bool,
}

/// Lines dropped by [`clean_tax_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupCounts {
    pub invalid: usize,
    pub zero_profit: usize,
}

/// Drops invalid lines first, then zero-profit lines.
pub fn clean_tax_report(report: &mut TaxFileReport, cleanup: Cleanup) -> CleanupCounts {
    let mut counts = CleanupCounts::default();
    if cleanup.invalid {
        counts.invalid = report.remove_invalid();
    }
    if cleanup.zero_profit {
        counts.zero_profit = report.remove_zero_profit();
    }

    debug!(
        invalid = counts.invalid,
        zero_profit = counts.zero_profit,
        remaining = report.lines.len(),
        "Tax report cleaned"
    );
    counts
}

/// Deletes one line that failed verification.
///
/// ## Errors
/// - `NOT_FOUND` - no such line
/// - `VALIDATION_ERROR` - the line is valid and stays
pub fn delete_tax_line(report: &mut TaxFileReport, line_number: u64) -> Result<VerifiedLine, AppError> {
    Ok(report.remove_line(line_number)?)
}

/// Replaces a line's values and regenerates its checksum.
///
/// ## Errors
/// - `NOT_FOUND` - no such line
/// - `VALIDATION_ERROR` - a new value breaks a field rule
pub fn edit_tax_line(
    report: &mut TaxFileReport,
    line_number: u64,
    edit: TaxLineEdit,
) -> Result<VerifiedLine, AppError> {
    let line = report.edit_line(line_number, edit)?.clone();
    debug!(line_number, checksum = %line.stated_checksum, "Tax line edited");
    Ok(line)
}

/// Writes the report's remaining lines back to its file.
pub fn save_tax_file(session: &Session, report: &TaxFileReport) -> Result<usize, AppError> {
    let written = session.exporter.save(report)?;
    info!(path = %report.path.display(), lines = written, "Tax file saved");
    Ok(written)
}
