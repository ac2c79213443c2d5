//! Folio CLI Binary

use anyhow::Context;
use clap::Parser;
use folio::logging::init_logging;
use folio::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut context =
        CliContext::new(cli.config.clone()).context("Failed to load configuration")?;
    if let Some(branch) = &cli.branch {
        context.config_mut().github.branch = branch.clone();
    }
    cli.apply_logging_overrides(&mut context.config_mut().logging);
    init_logging(Some(&context.config().logging)).context("Failed to initialize logging")?;

    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
