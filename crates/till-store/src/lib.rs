//! # till-store: Flat-File Storage Layer for Till
//!
//! This crate owns every file the till reads or writes: the bill ledger and
//! the tax transaction exports. Files are plain CSV with a header row.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Data Flow                                   │
//! │                                                                         │
//! │  Console (Generate bill / Search bill / Generate tax file)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  BillLedger   │    │  Repository   │    │ TaxExporter  │  │   │
//! │  │   │ (ledger.rs)   │    │   (bill.rs)   │    │  (tax.rs)    │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ id counter    │───►│ bills.csv     │    │ ttf_<id>.csv │  │   │
//! │  │   │ create/find   │    │ bill_items_*  │    │ verify       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/Bills/   <data_dir>/TaxFiles/                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Directory layout and file names
//! - [`ledger`] - Append-only bill ledger
//! - [`repository`] - CSV table access and the bill file codec
//! - [`tax`] - Tax file export and verification
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use till_core::BasketStore;
//! use till_store::{BillLedger, StoreConfig, TaxExporter};
//!
//! # fn main() -> Result<(), till_store::StoreError> {
//! let config = StoreConfig::new(".");
//! let mut ledger = BillLedger::new(config.clone());
//! ledger.reload()?;
//!
//! let mut basket = BasketStore::new();
//! basket.add("Cake124", 10.00, 15.00, 10.0, 2).expect("valid item");
//!
//! let created = ledger.create_bill(basket.snapshot())?;
//! basket.clear();
//!
//! TaxExporter::new(config).export_bill(&ledger, created.bill.id())?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod repository;
pub mod tax;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use ledger::{BillLedger, CreatedBill};
pub use repository::BillFiles;
pub use tax::{LineProblem, TaxExport, TaxExporter, TaxFileReport, TaxLineEdit, VerifiedLine};
