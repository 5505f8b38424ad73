//! # Storage Error Types
//!
//! Error types for ledger, file and export operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path and categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in console app) ← Code + operator message                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Menu prints it and shows the next prompt                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use till_core::{BillId, CoreError};

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a storage file failed.
    ///
    /// ## When This Occurs
    /// - Directory cannot be created
    /// - File permissions issue
    /// - Disk full
    ///
    /// In-memory state changes made before the failure are kept.
    #[error("Storage I/O failed for {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer or reader failed below the row level.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A stored file could not be understood.
    ///
    /// ## When This Occurs
    /// - Header row does not match the expected columns
    /// - Wrong column count, unparseable number or date
    /// - Stored item fails item validation
    /// - Bill listed in bills.csv has no item file
    #[error("Malformed storage in {} line {line}: {reason}", path.display())]
    MalformedStorage {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// No bill has this id.
    #[error("Bill #{0} not found")]
    BillNotFound(BillId),

    /// An export was requested with no bills in the ledger.
    #[error("No bills available to generate tax transaction files")]
    EmptyLedger,

    /// The stored bills failed to load, so the ledger refuses to write.
    ///
    /// Creating a bill would reuse id 1001 and overwrite the files that
    /// still need repairing.
    #[error("Stored bills could not be loaded ({reason}); new bills are disabled until Bills/ is repaired")]
    LedgerUnavailable { reason: String },

    /// A tax file report has no line with this number.
    #[error("Tax file has no line {0}")]
    TaxLineNotFound(u64),

    /// Only lines that failed verification may be deleted one by one.
    #[error("Tax file line {0} is valid and cannot be deleted")]
    TaxLineIsValid(u64),

    /// Domain rule violation (wraps CoreError).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a Persistence error for a path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StoreError::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a Csv error for a path.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a MalformedStorage error.
    pub fn malformed(path: impl AsRef<Path>, line: u64, reason: impl Into<String>) -> Self {
        StoreError::MalformedStorage {
            path: path.as_ref().to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    /// True for I/O level failures (as opposed to bad data or lookups).
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence { .. } | StoreError::Csv { .. })
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
