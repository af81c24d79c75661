use std::time::Instant;

use tracing::info;

use tickcast_core::{ForecastPipeline, ForecastView, PipelineConfig, Ticker};

use super::{build_source, elapsed_ms, Report, ReportData};
use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::metadata::{Metadata, RequestId};

pub async fn run(
    args: &HistoryArgs,
    config: PipelineConfig,
    request_id: RequestId,
) -> Result<Report, CliError> {
    let ticker: Ticker = args.ticker.parse()?;
    let source_id = config.source.kind;
    let window = config.history;
    let pipeline = ForecastPipeline::new(build_source(&config), config)?;

    let started = Instant::now();
    let series = pipeline.history(ticker).await?;
    let latency_ms = elapsed_ms(started);
    info!(%request_id, %ticker, rows = series.len(), latency_ms, "history loaded");

    let mut points = ForecastView::history_points(&series);
    if let Some(tail) = args.tail {
        let skip = points.len().saturating_sub(tail);
        points.drain(..skip);
    }

    Ok(Report {
        meta: Metadata::new(request_id, "history", source_id, window)
            .with_ticker(ticker)
            .with_latency_ms(latency_ms),
        data: ReportData::History { ticker, points },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickcast_core::{SourceId, TradingDate};

    #[tokio::test]
    async fn tail_keeps_most_recent_rows() {
        let mut config = PipelineConfig::default();
        config.source.kind = SourceId::Synthetic;
        let args = HistoryArgs {
            ticker: String::from("msft"),
            tail: Some(5),
        };

        let report = run(&args, config, RequestId::new_v4())
            .await
            .expect("history report");

        let ReportData::History { ticker, points } = &report.data else {
            panic!("expected history data");
        };
        assert_eq!(*ticker, Ticker::Msft);
        assert_eq!(points.len(), 5);
        let last = points.last().expect("rows").date;
        assert_eq!(last, TradingDate::parse("2024-12-31").expect("date"));
    }
}
