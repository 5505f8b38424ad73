//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use till_core::BillId;

/// Point-of-sale till: basket, bills and tax transaction files.
///
/// Without a subcommand the interactive menu starts.
#[derive(Debug, Parser)]
#[command(name = "till", version, about)]
pub struct Cli {
    /// Config file (default: till.toml in the platform config directory)
    #[arg(long, global = true, env = "TILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding Bills/ and TaxFiles/
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log more (info for everything, debug for till)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stored bills
    Bills(BillsArgs),

    /// Generate a tax transaction file
    Export(ExportArgs),

    /// Check a tax transaction file
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct BillsArgs {
    #[command(subcommand)]
    pub command: BillsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum BillsSubcommand {
    /// List every bill
    List(JsonFlag),

    /// Print one bill
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct JsonFlag {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Bill number
    pub id: BillId,

    #[command(flatten)]
    pub output: JsonFlag,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Only this bill (default: all bills)
    #[arg(long)]
    pub bill: Option<BillId>,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Tax transaction file to check
    pub path: PathBuf,

    /// Drop every line that fails verification
    #[arg(long)]
    pub drop_invalid: bool,

    /// Drop every line with zero profit
    #[arg(long)]
    pub drop_zero_profit: bool,

    /// Rewrite the file with the remaining lines
    #[arg(long)]
    pub save: bool,

    #[command(flatten)]
    pub output: JsonFlag,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from(["till", "--data-dir", "/srv/till", "bills", "show", "1001", "--json"]);

        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/till")));
        match cli.command {
            Some(Commands::Bills(BillsArgs {
                command: BillsSubcommand::Show(args),
            })) => {
                assert_eq!(args.id, 1001);
                assert!(args.output.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_and_menu() {
        let cli = Cli::parse_from(["till", "export", "--bill", "1002"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Export(ExportArgs { bill: Some(1002) }))
        ));

        let cli = Cli::parse_from(["till", "-v"]);
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_verify_cleanup_flags() {
        let cli = Cli::parse_from(["till", "verify", "ttf.csv", "--drop-invalid", "--save"]);
        match cli.command {
            Some(Commands::Verify(args)) => {
                assert_eq!(args.path, PathBuf::from("ttf.csv"));
                assert!(args.drop_invalid);
                assert!(!args.drop_zero_profit);
                assert!(args.save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_bill_id_is_rejected() {
        assert!(Cli::try_parse_from(["till", "bills", "show", "abc"]).is_err());
    }
}
