//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loyalty")]
#[command(about = "Redeem loyalty card coupons against a sale")]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir loyalty.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding products.hnt, coupons.hnt and cards.hnt
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Date to run as, YYYY-MM-DD (default: today)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sell items on a card, applying the selected coupons
    Redeem(RedeemArgs),
    /// Show a card's balance and coupons
    Card(CardArgs),
    /// List every issued coupon
    Coupons,
}

#[derive(Debug, Clone, Args)]
pub struct RedeemArgs {
    /// Card number
    #[arg(long)]
    pub card: String,

    /// Coupons to activate, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub coupons: Vec<String>,

    /// Barcodes sold, comma-separated, in sale order
    #[arg(long, value_delimiter = ',', required = true)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CardArgs {
    /// Card number
    pub number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redeem() {
        let cli = Cli::try_parse_from([
            "loyalty",
            "redeem",
            "--card",
            "10101",
            "--coupons",
            "1001,1003",
            "--items",
            "202-006,125-011",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Redeem(args) => {
                assert_eq!(args.card, "10101");
                assert_eq!(args.coupons, ["1001", "1003"]);
                assert_eq!(args.items, ["202-006", "125-011"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_redeem_requires_items() {
        assert!(Cli::try_parse_from(["loyalty", "redeem", "--card", "10101"]).is_err());
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "loyalty",
            "card",
            "10101",
            "--data-dir",
            "demo",
            "--date",
            "2024-05-10",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("demo")));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 5, 10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Card(CardArgs { ref number }) if number == "10101"));
    }
}
