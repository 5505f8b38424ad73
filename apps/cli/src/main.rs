//! # Till Console Entry Point
//!
//! Parses arguments and runs the console. Setup lives in `lib.rs` so the
//! tests can reach it.

use clap::Parser;

use till_cli::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = till_cli::run(cli) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
