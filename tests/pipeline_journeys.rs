//! End-to-end pipeline journeys
//!
//! These tests drive `run_forecast` the way a presentation layer would: a
//! ticker and a horizon in, a combined series or one readable message out.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tickcast_core::{
    ColumnLabel, DailyPricesRequest, ForecastPipeline, ForecastView, PipelineConfig,
    PipelineError, PriceSource, RawPriceTable, SeriesTag, SourceError, SourceId,
    SyntheticPriceSource, Ticker, TradingDate,
};

/// Source returning a fixed table and counting calls.
struct FixedSource {
    table: RawPriceTable,
    calls: Arc<AtomicUsize>,
}

impl FixedSource {
    fn new(table: RawPriceTable) -> Self {
        Self {
            table,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PriceSource for FixedSource {
    fn id(&self) -> SourceId {
        SourceId::Synthetic
    }

    fn fetch_daily_prices<'a>(
        &'a self,
        _request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let table = self.table.clone();
        Box::pin(async move { Ok(table) })
    }
}

/// Source that always fails.
struct DownSource;

impl PriceSource for DownSource {
    fn id(&self) -> SourceId {
        SourceId::Yahoo
    }

    fn fetch_daily_prices<'a>(
        &'a self,
        _request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>> {
        Box::pin(async { Err(SourceError::unavailable("upstream returned 503")) })
    }
}

/// 500 business days of "Close GOOG" prices 100..599.
fn rising_composite_table() -> RawPriceTable {
    let dates = TradingDate::parse("2022-12-30")
        .expect("valid date")
        .business_days_after(500)
        .expect("in range");
    let closes = (0..500).map(|i| Some(100.0 + i as f64)).collect();
    RawPriceTable::new(dates)
        .with_column(ColumnLabel::composite(["Close", "GOOG"]), closes)
        .expect("valid column")
}

// =============================================================================
// Journey: Successful Forecast
// =============================================================================

#[tokio::test]
async fn when_user_requests_goog_for_a_week_combined_series_ends_with_seven_forecasts() {
    // Given: A source returning 500 rising closes under a composite label
    let source = FixedSource::new(rising_composite_table());
    let calls = Arc::clone(&source.calls);
    let pipeline =
        ForecastPipeline::new(source, PipelineConfig::default()).expect("valid config");

    // When: The user asks for a 7-day forecast
    let outcome = pipeline
        .run_forecast(Ticker::Goog, 7)
        .await
        .expect("pipeline succeeds");

    // Then: History is intact and the forecast follows it
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.historical.len(), 500);
    assert_eq!(outcome.forecast.len(), 7);
    assert_eq!(outcome.combined.len(), 507);
    let first_forecast = outcome.forecast.first_date().expect("non-empty");
    assert!(first_forecast > outcome.historical.last_date());
    assert_eq!(outcome.combined.forecast().len(), 7);
    assert!(outcome
        .combined
        .forecast()
        .iter()
        .all(|point| point.tag == SeriesTag::Forecast));
}

#[tokio::test]
async fn when_user_picks_a_display_label_pipeline_accepts_it() {
    // Given: The label shown by a selection widget
    let ticker: Ticker = "Microsoft (MSFT)".parse().expect("known label");
    let pipeline = ForecastPipeline::new(SyntheticPriceSource::new(), PipelineConfig::default())
        .expect("valid config");

    // When: A 30-day forecast runs
    let result = pipeline.run_forecast(ticker, 30).await;

    // Then: The view carries both series and a status message
    let view = ForecastView::from_result(&result);
    assert!(!view.is_error());
    assert_eq!(view.title, "Microsoft (MSFT) closing price");
    assert_eq!(
        view.combined.len(),
        view.historical.len() + 30,
        "combined = history + forecast"
    );
}

#[tokio::test]
async fn when_same_request_runs_twice_results_are_identical() {
    let pipeline = ForecastPipeline::new(SyntheticPriceSource::new(), PipelineConfig::default())
        .expect("valid config");

    let first = pipeline.run_forecast(Ticker::Goog, 14).await.expect("first");
    let second = pipeline.run_forecast(Ticker::Goog, 14).await.expect("second");

    assert_eq!(first, second);
}

// =============================================================================
// Journey: Failures Surface As One Message
// =============================================================================

#[tokio::test]
async fn when_source_returns_nothing_user_sees_empty_data_message() {
    let pipeline = ForecastPipeline::new(
        FixedSource::new(RawPriceTable::empty()),
        PipelineConfig::default(),
    )
    .expect("valid config");

    let result = pipeline.run_forecast(Ticker::Goog, 30).await;

    let view = ForecastView::from_result(&result);
    assert!(view.is_error());
    assert_eq!(view.error_code, Some("forecast.empty_data"));
    assert!(view.combined.is_empty());
}

#[tokio::test]
async fn when_source_is_down_error_is_reported_not_retried_by_pipeline() {
    let pipeline =
        ForecastPipeline::new(DownSource, PipelineConfig::default()).expect("valid config");

    let err = pipeline
        .run_forecast(Ticker::Msft, 30)
        .await
        .expect_err("source failure propagates");

    assert!(matches!(err, PipelineError::Source(_)));
    assert_eq!(err.code(), "source.unavailable");
}

#[tokio::test]
async fn when_horizon_is_outside_bounds_request_is_rejected_before_fetching() {
    let source = FixedSource::new(rising_composite_table());
    let calls = Arc::clone(&source.calls);
    let pipeline =
        ForecastPipeline::new(source, PipelineConfig::default()).expect("valid config");

    for days in [0, 6, 91] {
        let err = pipeline
            .run_forecast(Ticker::Goog, days)
            .await
            .expect_err("out of range");
        assert_eq!(err.code(), "request.invalid");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn when_history_is_too_short_user_sees_model_fit_message() {
    let dates = TradingDate::parse("2024-12-20")
        .expect("valid date")
        .business_days_after(8)
        .expect("in range");
    let table = RawPriceTable::new(dates)
        .with_column(ColumnLabel::flat("Close"), vec![Some(10.0); 8])
        .expect("valid column");
    let pipeline = ForecastPipeline::new(FixedSource::new(table), PipelineConfig::default())
        .expect("valid config");

    let err = pipeline
        .run_forecast(Ticker::Goog, 7)
        .await
        .expect_err("eight points cannot identify the model");

    assert_eq!(err.code(), "forecast.model_fit");
    assert!(!err.user_message().is_empty());
}
