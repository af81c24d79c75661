mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    let report = commands::run(&cli).await?;
    output::render(&report, cli.format, cli.pretty)?;

    if report.is_failure() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
