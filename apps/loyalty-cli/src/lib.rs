//! # loyalty-cli: Redemption Driver
//!
//! Loads the store from the data directory, runs one command, and prints
//! its report.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Parse Arguments (clap)                                              │
//! │                                                                         │
//! │  2. Load Configuration ────────────────────────────────────────────────►│
//! │     defaults → loyalty.toml → LOYALTY_* env → flags                    │
//! │     logged through a scoped startup subscriber (RUST_LOG/LOYALTY_LOG)  │
//! │                                                                         │
//! │  3. Initialize Tracing ────────────────────────────────────────────────►│
//! │     -v forces debug, else RUST_LOG, else [logging] filter              │
//! │     Logs go to stderr so --json output stays clean                     │
//! │                                                                         │
//! │  4. Load Store ────────────────────────────────────────────────────────►│
//! │     products.hnt → coupons.hnt → cards.hnt                             │
//! │                                                                         │
//! │  5. Run Command, Print Report                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod report;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::AppConfig;
use error::CliResult;
use loyalty_store::Store;

/// Runs the parsed command line to completion.
pub fn run(cli: Cli) -> CliResult<()> {
    let startup_filter = std::env::var(config::ENV_LOG).unwrap_or_else(|_| "info".to_string());
    let config = tracing::subscriber::with_default(
        build_subscriber(log_filter(&startup_filter, cli.verbose), io::stderr),
        || resolve_config(&cli),
    )?;
    init_tracing(&config.logging.filter, cli.verbose);
    debug!(?config, "Configuration resolved");

    let today = cli.date.unwrap_or_else(local_today);
    let mut store = Store::load_from_dir(&config.data.dir, &config.data_files(), today)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Redeem(args) => {
            let report = commands::redeem(&mut store, args, today)?;
            emit(&mut out, cli.json, &report, |o| report.render(o))?;
        }
        Command::Card(args) => {
            let report = commands::card(&store, args, today)?;
            emit(&mut out, cli.json, &report, |o| report.render(o))?;
        }
        Command::Coupons => {
            let listing = commands::coupons(&store);
            emit(&mut out, cli.json, &listing, |o| listing.render(o))?;
        }
    }

    info!("Done");
    Ok(())
}

/// Applies command-line flags on top of the loaded configuration.
fn resolve_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data.dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn emit<W: Write, T: Serialize>(
    out: &mut W,
    json: bool,
    report: &T,
    render: impl FnOnce(&mut W) -> io::Result<()>,
) -> CliResult<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        render(out)?;
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(configured: &str, verbose: bool) {
    build_subscriber(log_filter(configured, verbose), io::stderr).init();
}

/// Picks the log filter.
///
/// ## Log Levels
/// - `-v` - Show debug messages regardless of other settings
/// - `RUST_LOG=...` - Standard env filter
/// - otherwise `configured`, falling back to `info` if it does not parse
fn log_filter(configured: &str, verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn build_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .finish()
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
