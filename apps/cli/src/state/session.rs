//! # Session State
//!
//! Everything one operator session owns: the basket, the bill ledger and the
//! configuration.
//!
//! ## Ownership
//! The console runs on one thread and handles one action at a time, so the
//! session owns its stores directly and commands borrow it mutably. A host
//! that serves several sessions at once would need to put the basket and the
//! ledger behind a lock.

use till_core::BasketStore;
use till_store::{BillLedger, StoreError, TaxExporter};
use tracing::info;

use super::config::AppConfig;

/// Result of loading the stored bills at startup.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Bills could not be read; the session starts with an empty ledger.
    Failed(StoreError),
}

#[derive(Debug)]
pub struct Session {
    pub config: AppConfig,
    pub basket: BasketStore,
    pub ledger: BillLedger,
    pub exporter: TaxExporter,
}

impl Session {
    /// Creates a session with an empty ledger. Nothing is read from disk.
    pub fn new(config: AppConfig) -> Self {
        let store_config = config.store_config();

        Session {
            basket: BasketStore::new(),
            ledger: BillLedger::new(store_config.clone()),
            exporter: TaxExporter::new(store_config),
            config,
        }
    }

    /// Creates a session and reloads the stored bills.
    ///
    /// A reload failure does not prevent the session from starting.
    pub fn open(config: AppConfig) -> (Self, LoadOutcome) {
        let mut session = Session::new(config);

        let outcome = match session.ledger.reload() {
            Ok(count) => LoadOutcome::Loaded(count),
            Err(err) => LoadOutcome::Failed(err),
        };

        info!(
            data_dir = %session.config.storage.data_dir.display(),
            next_bill = session.ledger.next_id(),
            "Session opened"
        );

        (session, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig::default().with_data_dir(Some(dir.path().to_path_buf()))
    }

    #[test]
    fn test_open_empty_dir() {
        let dir = TempDir::new().unwrap();
        let (session, outcome) = Session::open(config_in(&dir));

        assert!(matches!(outcome, LoadOutcome::Loaded(0)));
        assert!(session.basket.is_empty());
        assert_eq!(session.ledger.next_id(), 1001);
    }

    #[test]
    fn test_open_corrupt_dir_still_starts() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Bills")).unwrap();
        std::fs::write(dir.path().join("Bills/bills.csv"), "Nope\n").unwrap();

        let (session, outcome) = Session::open(config_in(&dir));

        assert!(matches!(outcome, LoadOutcome::Failed(StoreError::MalformedStorage { .. })));
        assert!(session.ledger.is_empty());
        assert!(!session.ledger.is_writable());
    }
}
