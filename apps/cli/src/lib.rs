//! # Till Console Library
//!
//! Core library for the `till` console. `main.rs` parses arguments and hands
//! them to [`run`].
//!
//! ## Module Organization
//! ```text
//! till_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap arguments
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (TOML + env)
//! │   └── session.rs  ◄─── Basket + ledger for one run
//! ├── commands/
//! │   ├── basket.rs   ◄─── Basket line commands
//! │   ├── bill.rs     ◄─── Bill commands
//! │   └── tax.rs      ◄─── Tax file commands
//! ├── menu.rs         ◄─── Interactive prompts
//! ├── render.rs       ◄─── Text and JSON output
//! └── error.rs        ◄─── AppError for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod menu;
pub mod render;
pub mod state;

use std::io::IsTerminal;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{BillsSubcommand, Cli, Commands};
use commands::tax::{Cleanup, ExportScope};
use error::{AppError, ErrorCode};
use state::{AppConfig, LoadOutcome, Session};

/// Runs the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: WARN (INFO + till DEBUG with --verbose)                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → till.toml → TILL_* env → --data-dir                    │
/// │                                                                         │
/// │  3. Open Session ─────────────────────────────────────────────────────► │
/// │     • Reload Bills/ (a bad file is reported, ledger is read-only)       │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • Subcommand: run it once                                           │
/// │     • None: interactive menu                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?.with_data_dir(cli.data_dir.clone());
    info!(store = %config.store.name, "Starting till");

    let (mut session, outcome) = Session::open(config);
    match outcome {
        LoadOutcome::Loaded(count) => info!(bills = count, "Bills reloaded"),
        LoadOutcome::Failed(err) => {
            warn!(error = %err, "Continuing with an empty, read-only ledger");
            eprintln!(
                "Warning: stored bills could not be loaded ({}). Starting with no bills; \
                 new bills are disabled until Bills/ is repaired.",
                err
            );
        }
    }

    match cli.command {
        None => {
            if !std::io::stdin().is_terminal() {
                return Err(AppError::new(
                    ErrorCode::InputError,
                    "The interactive menu needs a terminal. Use a subcommand, see --help.",
                ));
            }
            menu::run_menu(&mut session)
        }
        Some(command) => run_command(&session, command),
    }
}

/// Runs one subcommand against the loaded bills.
fn run_command(session: &Session, command: Commands) -> Result<(), AppError> {
    let config = &session.config;

    match command {
        Commands::Bills(args) => match args.command {
            BillsSubcommand::List(output) => {
                let bills = commands::bill::list_bills(session);
                if output.json {
                    println!("{}", render::to_json(&bills)?);
                } else {
                    println!("{}", render::bills_table(config, bills));
                }
            }
            BillsSubcommand::Show(args) => {
                let bill = commands::bill::find_bill(session, args.id)?;
                if args.output.json {
                    println!("{}", render::to_json(bill)?);
                } else {
                    println!("{}", render::bill_banner(config, bill));
                }
            }
        },
        Commands::Export(args) => {
            let scope = args.bill.map_or(ExportScope::AllBills, ExportScope::Bill);
            let export = commands::tax::export_tax_file(session, scope)?;
            println!("{}", render::export_summary(&export));
        }
        Commands::Verify(args) => {
            let mut report = commands::tax::verify_tax_file(session, &args.path)?;
            let cleanup = Cleanup {
                invalid: args.drop_invalid,
                zero_profit: args.drop_zero_profit,
            };
            let counts = commands::tax::clean_tax_report(&mut report, cleanup);

            if args.output.json {
                println!("{}", render::to_json(&report)?);
            } else {
                println!("{}", render::tax_report(config, &report));
                if cleanup != Cleanup::default() {
                    println!("{}", render::cleanup_summary(&counts));
                }
            }

            if args.save {
                let written = commands::tax::save_tax_file(session, &report)?;
                if !args.output.json {
                    println!("Saved {} lines to '{}'", written, report.path.display());
                }
            }
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till_store=debug` - Storage only
/// - Default: WARN, or `info,till=debug` with `--verbose`
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,till=debug,till_core=debug,till_store=debug,till_cli=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
