use anyhow::Result;
use clap::Parser;
use drillbook::cli::{init_logging, Cli};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if drillbook::commands::dispatch(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
