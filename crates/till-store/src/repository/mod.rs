//! # Repository Module
//!
//! Flat-file table access shared by the bill files and the tax files.
//!
//! ## Table Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillLedger / TaxExporter                                              │
//! │       │                                                                 │
//! │       │  write_table(path, HEADER, rows)   read_table(path, HEADER)    │
//! │       ▼                                                                 │
//! │  One CSV file = header row + data rows                                 │
//! │  • Writes always truncate (full dump, never append)                    │
//! │  • Reads check the header and the column count of every row            │
//! │  • A missing file reads as `None`, not as an error                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BillFiles`] - bills.csv and bill_items_<id>.csv

pub mod bill;

pub use bill::BillFiles;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;

use crate::error::{StoreError, StoreResult};

/// One data row and the file line it came from.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub line: u64,
    pub fields: StringRecord,
}

impl Row {
    /// Returns a field, or `""` past the end.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).unwrap_or("")
    }

    /// Parses a field, reporting the column name and raw text on failure.
    pub fn parse<T: FromStr>(&self, path: &Path, index: usize, column: &str) -> StoreResult<T> {
        let raw = self.field(index);
        raw.parse::<T>().map_err(|_| {
            StoreError::malformed(path, self.line, format!("invalid {} '{}'", column, raw))
        })
    }
}

/// Creates a directory (and parents) if it does not exist.
pub(crate) fn ensure_dir(dir: &Path) -> StoreResult<()> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
}

/// Overwrites `path` with a header row followed by `rows`.
pub(crate) fn write_table<I>(path: &Path, header: &[&str], rows: I) -> StoreResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;

    writer
        .write_record(header)
        .map_err(|e| StoreError::csv(path, e))?;

    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| StoreError::csv(path, e))?;
    }

    writer.flush().map_err(|e| StoreError::io(path, e))
}

/// Reads every data row of `path`.
///
/// ## Returns
/// - `Ok(None)` - the file does not exist
/// - `Ok(Some(rows))` - header matched and every row has `header.len()` fields
/// - `Err(MalformedStorage)` - header mismatch or wrong column count
pub(crate) fn read_table(path: &Path, header: &[&str]) -> StoreResult<Option<Vec<Row>>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let mut records = reader.records();

    let found_header = match records.next() {
        Some(record) => record.map_err(|e| StoreError::csv(path, e))?,
        None => return Ok(Some(Vec::new())),
    };

    if found_header.iter().ne(header.iter().copied()) {
        return Err(StoreError::malformed(
            path,
            1,
            format!("expected header '{}'", header.join(",")),
        ));
    }

    let mut rows = Vec::new();
    for record in records {
        let fields = record.map_err(|e| StoreError::csv(path, e))?;
        let line = fields.position().map(|p| p.line()).unwrap_or(0);

        if fields.len() != header.len() {
            return Err(StoreError::malformed(
                path,
                line,
                format!("expected {} columns, found {}", header.len(), fields.len()),
            ));
        }

        rows.push(Row { line, fields });
    }

    Ok(Some(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: [&str; 2] = ["Name", "Value"];

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let rows = read_table(&dir.path().join("absent.csv"), &HEADER).unwrap();
        assert!(rows.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");

        write_table(
            &path,
            &HEADER,
            vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), "2".to_string()],
            ],
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,Value\na,1\nb,2\n");

        let rows = read_table(&path, &HEADER).unwrap().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].field(0), "b");
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].parse::<i32>(&path, 1, "Value").unwrap(), 2);
    }

    #[test]
    fn test_write_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");

        write_table(&path, &HEADER, vec![vec!["a".to_string(), "1".to_string()]]).unwrap();
        write_table(&path, &HEADER, Vec::<Vec<String>>::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,Value\n");
    }

    #[test]
    fn test_header_mismatch_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "Wrong,Header\na,1\n").unwrap();

        let err = read_table(&path, &HEADER).unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage { line: 1, .. }));
    }

    #[test]
    fn test_column_count_is_checked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "Name,Value\na,1\nb\n").unwrap();

        let err = read_table(&path, &HEADER).unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage { line: 3, .. }));
    }

    #[test]
    fn test_parse_reports_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "Name,Value\na,x\n").unwrap();

        let rows = read_table(&path, &HEADER).unwrap().unwrap();
        let err = rows[0].parse::<f64>(&path, 1, "Value").unwrap_err();
        assert!(err.to_string().ends_with("line 2: invalid Value 'x'"));
    }
}
