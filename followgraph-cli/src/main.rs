//! `followgraph` binary.
//!
//! Parses arguments, generates the graph and writes it to `--out` or
//! `stdout`. Failures are logged with their stable error code when one
//! exists and turn into a non-zero exit status.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use followgraph_cli::{
    cli::{Cli, CliError, run_cli, write_summary},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to generate follow graph")?;
    write_summary(&summary).context("failed to write output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.downcast_ref::<CliError>().and_then(CliError::code);
        let chain = format!("{err:#}");
        error!(
            error = %chain,
            code = code.map(field::display),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not available until logging initialises"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
