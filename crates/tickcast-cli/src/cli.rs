//! CLI argument definitions for tickcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `forecast` | Fit the model and project closing prices |
//! | `history` | Fetch and clean historical closes only |
//! | `tickers` | List supported tickers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--source` | from config (`yahoo`) | Price source |
//! | `--config` | none | JSON pipeline configuration file |
//! | `--start` / `--end` | from config | Inclusive history window |
//! | `--timeout-ms` | from config (`10000`) | Per-request timeout |
//! | `--max-retries` | from config (`3`) | Retries for transient failures |
//! | `--verbose` | `false` | Debug-level logs on stderr |
//! | `--log-format` | `text` | Log format (text, json) |
//!
//! # Examples
//!
//! ```bash
//! tickcast forecast GOOG --horizon 30 --format table
//! tickcast forecast "Microsoft (MSFT)" --horizon 7 --pretty
//! tickcast history MSFT --start 2023-01-01 --format csv
//! tickcast forecast GOOG --source synthetic
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Closing-price forecasts for a fixed set of equities.
#[derive(Debug, Parser)]
#[command(
    name = "tickcast",
    author,
    version,
    about = "Short-horizon ARIMA price forecasts",
    long_about = "tickcast downloads daily closing prices, fits an ARIMA(5,1,2) model and \
projects the following business days.\n\
\n\
Use 'tickcast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Price source; overrides the configuration file.
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceSelector>,

    /// Path to a JSON pipeline configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// First day of history (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub start: Option<String>,

    /// Last day of history, inclusive (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub end: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Retries for transient source failures.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object with metadata.
    Json,
    /// Aligned columns for terminal display.
    Table,
    /// `date,price,tag` rows.
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Yahoo Finance chart API.
    Yahoo,
    /// Deterministic offline prices.
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast closing prices for a ticker.
    ///
    /// # Examples
    ///
    ///   tickcast forecast GOOG
    ///   tickcast forecast MSFT --horizon 60 --format table
    Forecast(ForecastArgs),

    /// Show the cleaned closing-price history for a ticker.
    History(HistoryArgs),

    /// List supported tickers.
    Tickers,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Ticker symbol or "Company (TICKER)" label.
    pub ticker: String,

    /// Business days to forecast.
    #[arg(long, default_value_t = 30)]
    pub horizon: usize,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Ticker symbol or "Company (TICKER)" label.
    pub ticker: String,

    /// Only show the last N rows.
    #[arg(long)]
    pub tail: Option<usize>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn forecast_defaults_to_thirty_days() {
        let cli = Cli::try_parse_from(["tickcast", "forecast", "GOOG"]).expect("parses");
        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.ticker, "GOOG");
                assert_eq!(args.horizon, 30);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.source.is_none());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "tickcast",
            "history",
            "MSFT",
            "--format",
            "csv",
            "--source",
            "synthetic",
            "--start",
            "2023-01-01",
        ])
        .expect("parses");

        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.source, Some(SourceSelector::Synthetic));
        assert_eq!(cli.start.as_deref(), Some("2023-01-01"));
    }
}
