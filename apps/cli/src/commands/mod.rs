//! # Commands Module
//!
//! Every operator action as a plain function over the [`Session`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── basket.rs   ◄─── Add, update, delete, view basket lines
//! ├── bill.rs     ◄─── Generate, find, list bills
//! └── tax.rs      ◄─── Tax file export and verification
//! ```
//!
//! ## How Commands Are Called
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Interactive menu (menu.rs)          One-shot subcommand (lib.rs)      │
//! │  prompts for values                  values from clap                  │
//! │         │                                     │                         │
//! │         └──────────────┬──────────────────────┘                         │
//! │                        ▼                                                │
//! │  fn add_item(session: &mut Session, code, prices)                      │
//! │      -> Result<Item, AppError>                                         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  render.rs turns the result into text (or JSON)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never print and never prompt.
//!
//! [`Session`]: crate::state::Session

pub mod basket;
pub mod bill;
pub mod tax;
