//! # Storage Layout
//!
//! Where the till keeps its files.
//!
//! ```text
//! <root>/
//! ├── Bills/
//! │   ├── bills.csv              BillID,Date,GrandTotal
//! │   ├── bill_items_1001.csv    ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Quantity
//! │   └── bill_items_1002.csv
//! └── TaxFiles/
//!     ├── ttf_1001.csv           ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Checksum
//!     └── ttf_all_bills.csv
//! ```
//!
//! Directories are created on demand by the writers, never here.

use std::path::PathBuf;

use till_core::BillId;

/// Default bills directory name.
pub const BILLS_DIR: &str = "Bills";

/// Default tax export directory name.
pub const TAX_DIR: &str = "TaxFiles";

/// Bill header file name inside the bills directory.
pub const BILLS_FILE: &str = "bills.csv";

/// Storage configuration.
///
/// ## Example
/// ```rust
/// use till_store::StoreConfig;
///
/// let config = StoreConfig::new("/var/till").tax_dir("Exports");
/// assert!(config.bill_items_path(1001).ends_with("Bills/bill_items_1001.csv"));
/// assert!(config.tax_all_path().ends_with("Exports/ttf_all_bills.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Parent directory of the bills and tax directories.
    pub root: PathBuf,

    /// Bills directory name.
    /// Default: "Bills"
    pub bills_dir: String,

    /// Tax export directory name.
    /// Default: "TaxFiles"
    pub tax_dir: String,
}

impl StoreConfig {
    /// Creates a configuration rooted at `root` with the default names.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: root.into(),
            bills_dir: BILLS_DIR.to_string(),
            tax_dir: TAX_DIR.to_string(),
        }
    }

    /// Sets the bills directory name.
    pub fn bills_dir(mut self, name: impl Into<String>) -> Self {
        self.bills_dir = name.into();
        self
    }

    /// Sets the tax export directory name.
    pub fn tax_dir(mut self, name: impl Into<String>) -> Self {
        self.tax_dir = name.into();
        self
    }

    pub fn bills_path(&self) -> PathBuf {
        self.root.join(&self.bills_dir)
    }

    /// `Bills/bills.csv`
    pub fn bill_header_path(&self) -> PathBuf {
        self.bills_path().join(BILLS_FILE)
    }

    /// `Bills/bill_items_<id>.csv`
    pub fn bill_items_path(&self, bill_id: BillId) -> PathBuf {
        self.bills_path().join(format!("bill_items_{}.csv", bill_id))
    }

    pub fn tax_path(&self) -> PathBuf {
        self.root.join(&self.tax_dir)
    }

    /// `TaxFiles/ttf_<id>.csv`
    pub fn tax_bill_path(&self, bill_id: BillId) -> PathBuf {
        self.tax_path().join(format!("ttf_{}.csv", bill_id))
    }

    /// `TaxFiles/ttf_all_bills.csv`
    pub fn tax_all_path(&self) -> PathBuf {
        self.tax_path().join("ttf_all_bills.csv")
    }
}

impl Default for StoreConfig {
    /// Files relative to the working directory.
    fn default() -> Self {
        StoreConfig::new(".")
    }
}
