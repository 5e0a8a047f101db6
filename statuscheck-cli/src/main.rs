//! check-statuspage
//!
//! Usage: check-statuspage --url <URL> [--container <ELEMENT>] [-t <SECONDS>] [-v]

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use statuscheck_cli::{CheckState, Cli, init_logging, run};

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also land here
            let usage_error = err.use_stderr();
            err.print().context("failed to print usage")?;
            return Ok(if usage_error {
                CheckState::Unknown.into()
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();
    let state = run(&cli, &mut stdout).context("failed to write check output")?;
    Ok(state.into())
}
