mod forecast;
mod history;
mod tickers;

use serde::Serialize;
use tracing::debug;

use tickcast_core::{
    ChartPoint, ForecastView, ModelSummary, PipelineConfig, PriceSource, RetryConfig, SourceId,
    SyntheticPriceSource, Ticker, TradingDate, YahooPriceSource,
};

use crate::cli::{Cli, Command, SourceSelector};
use crate::error::CliError;
use crate::metadata::{Metadata, RequestId};

/// Command output: metadata plus one of the payload shapes.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: Metadata,
    pub data: ReportData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Forecast {
        #[serde(flatten)]
        view: ForecastView,
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<ModelSummary>,
    },
    History {
        ticker: Ticker,
        points: Vec<ChartPoint>,
    },
    Tickers {
        tickers: Vec<TickerInfo>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerInfo {
    pub symbol: &'static str,
    pub company: &'static str,
    pub label: String,
}

impl Report {
    /// A forecast that produced an error view rather than a series.
    pub fn is_failure(&self) -> bool {
        matches!(&self.data, ReportData::Forecast { view, .. } if view.is_error())
    }
}

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    let request_id = RequestId::new_v4();
    let config = resolve_config(cli)?;
    debug!(
        %request_id,
        source = %config.source.kind,
        start = %config.history.start,
        end = %config.history.end,
        "resolved configuration"
    );

    match &cli.command {
        Command::Forecast(args) => forecast::run(args, config, request_id).await,
        Command::History(args) => history::run(args, config, request_id).await,
        Command::Tickers => Ok(tickers::run(&config, request_id)),
    }
}

/// Configuration file (or defaults) with command-line overrides applied.
pub(crate) fn resolve_config(cli: &Cli) -> Result<PipelineConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    let start = cli.start.as_deref().map(TradingDate::parse).transpose()?;
    let end = cli.end.as_deref().map(TradingDate::parse).transpose()?;
    config = config.with_window(start, end)?;

    if let Some(selector) = cli.source {
        config.source.kind = to_source_id(selector);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.source.timeout_ms = timeout_ms;
    }
    if let Some(max_retries) = cli.max_retries {
        config.source.max_retries = max_retries;
    }

    config.validate()?;
    Ok(config)
}

pub(crate) fn build_source(config: &PipelineConfig) -> Box<dyn PriceSource> {
    match config.source.kind {
        SourceId::Yahoo => Box::new(
            YahooPriceSource::new()
                .with_timeout_ms(config.source.timeout_ms)
                .with_retry(RetryConfig::exponential(config.source.max_retries)),
        ),
        SourceId::Synthetic => Box::new(SyntheticPriceSource::new()),
    }
}

pub(crate) fn elapsed_ms(started: std::time::Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn to_source_id(selector: SourceSelector) -> SourceId {
    match selector {
        SourceSelector::Yahoo => SourceId::Yahoo,
        SourceSelector::Synthetic => SourceId::Synthetic,
    }
}
