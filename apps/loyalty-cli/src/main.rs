//! `loyalty` binary entry point.

use clap::Parser;

use loyalty_cli::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = loyalty_cli::run(cli) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
