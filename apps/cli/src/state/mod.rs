//! # State Module
//!
//! Application state for the console.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Session                                 │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐      │   │
//! │  │  │ BasketStore  │  │  BillLedger  │  │    AppConfig     │      │   │
//! │  │  │              │  │              │  │                  │      │   │
//! │  │  │  unbilled    │  │  bills +     │  │  store name      │      │   │
//! │  │  │  item lines  │  │  next id     │  │  currency        │      │   │
//! │  │  │              │  │              │  │  data dir        │      │   │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────┘      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Owned by the menu loop (or a single subcommand) for the whole run.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{AppConfig, ConfigError, StorageSettings, StoreSettings, CONFIG_FILE};
pub use session::{LoadOutcome, Session};
