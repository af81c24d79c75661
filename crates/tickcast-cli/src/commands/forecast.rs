use std::time::Instant;

use tracing::{info, warn};

use tickcast_core::{ForecastPipeline, ForecastView, PipelineConfig, Ticker};

use super::{build_source, elapsed_ms, Report, ReportData};
use crate::cli::ForecastArgs;
use crate::error::CliError;
use crate::metadata::{Metadata, RequestId};

/// Pipeline failures become an error view rather than a `CliError`, so the
/// caller still renders the message and exits with the pipeline code.
pub async fn run(
    args: &ForecastArgs,
    config: PipelineConfig,
    request_id: RequestId,
) -> Result<Report, CliError> {
    let ticker: Ticker = args.ticker.parse()?;
    let source_id = config.source.kind;
    let window = config.history;
    let pipeline = ForecastPipeline::new(build_source(&config), config)?;

    info!(%request_id, %ticker, horizon = args.horizon, source = %source_id, "forecast started");
    let started = Instant::now();
    let result = pipeline.run_forecast(ticker, args.horizon).await;
    let latency_ms = elapsed_ms(started);

    let model = match &result {
        Ok(outcome) => {
            info!(
                %request_id,
                observations = outcome.model.observations,
                iterations = outcome.model.iterations,
                converged = outcome.model.converged,
                latency_ms,
                "forecast finished"
            );
            Some(outcome.model.clone())
        }
        Err(error) => {
            warn!(%request_id, code = error.code(), error = %error, latency_ms, "forecast failed");
            None
        }
    };

    Ok(Report {
        meta: Metadata::new(request_id, "forecast", source_id, window)
            .with_ticker(ticker)
            .with_horizon(args.horizon)
            .with_latency_ms(latency_ms),
        data: ReportData::Forecast {
            view: ForecastView::from_result(&result),
            model,
        },
    })
}
