//! Contract tests for `PriceSource` implementations
//!
//! Every source must honour the same observable contract: its id is stable,
//! rows fall inside the requested window, closes are discoverable by the
//! normalizer and failures arrive as typed `SourceError`s.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickcast_core::{
    DailyPricesRequest, DateWindow, HttpClient, HttpError, HttpRequest, HttpResponse,
    PriceSource, RawPriceTable, RetryConfig, SeriesNormalizer, SourceErrorKind, SourceId,
    SyntheticPriceSource, Ticker, TradingDate, YahooPriceSource,
};

const CHART: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"symbol": "MSFT", "gmtoffset": -18000},
            "timestamp": [1704205800, 1704292200],
            "indicators": {
                "quote": [{
                    "open": [373.86, 369.01],
                    "high": [375.90, 373.26],
                    "low": [366.77, 368.51],
                    "close": [370.87, 370.60],
                    "volume": [25258600, 23083500]
                }]
            }
        }],
        "error": null
    }
}"#;

struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
}

impl ScriptedHttpClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
        })
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .responses
            .lock()
            .expect("not poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::connect("script exhausted")));
        Box::pin(async move { response })
    }
}

fn request(ticker: Ticker, start: &str, end: &str) -> DailyPricesRequest {
    let window = DateWindow::new(
        TradingDate::parse(start).expect("valid"),
        TradingDate::parse(end).expect("valid"),
    )
    .expect("ordered window");
    DailyPricesRequest::new(ticker, window)
}

fn yahoo(responses: Vec<Result<HttpResponse, HttpError>>) -> YahooPriceSource {
    YahooPriceSource::with_http_client(ScriptedHttpClient::new(responses))
        .with_retry(RetryConfig::fixed(Duration::ZERO, 1))
        .with_base_url("https://chart.test/v8/finance/chart")
}

async fn assert_rows_inside_window(source: &dyn PriceSource, request: DailyPricesRequest) {
    let table: RawPriceTable = source
        .fetch_daily_prices(request)
        .await
        .expect("fetch succeeds");

    let series = SeriesNormalizer::default()
        .normalize(&table)
        .expect("close column is discoverable");
    assert!(series
        .points()
        .iter()
        .all(|point| request.window.contains(point.date)));
}

// =============================================================================
// Contract: Successful Fetches
// =============================================================================

#[tokio::test]
async fn synthetic_source_honours_window_and_close_contract() {
    let source = SyntheticPriceSource::new();
    assert_eq!(source.id(), SourceId::Synthetic);
    assert_rows_inside_window(&source, request(Ticker::Goog, "2024-01-01", "2024-06-28")).await;
}

#[tokio::test]
async fn yahoo_source_honours_window_and_close_contract() {
    let source = yahoo(vec![Ok(HttpResponse::ok_json(CHART))]);
    assert_eq!(source.id(), SourceId::Yahoo);
    assert_rows_inside_window(&source, request(Ticker::Msft, "2024-01-01", "2024-01-05")).await;
}

#[tokio::test]
async fn boxed_sources_behave_like_their_inner_source() {
    let boxed: Box<dyn PriceSource> = Box::new(SyntheticPriceSource::new());
    let direct = SyntheticPriceSource::new();
    let req = request(Ticker::Msft, "2024-03-01", "2024-03-29");

    let from_box = boxed.fetch_daily_prices(req).await.expect("boxed fetch");
    let from_direct = direct.fetch_daily_prices(req).await.expect("direct fetch");

    assert_eq!(boxed.id(), direct.id());
    assert_eq!(from_box, from_direct);
}

// =============================================================================
// Contract: Failures
// =============================================================================

#[tokio::test]
async fn unknown_symbol_maps_to_not_found_and_is_not_retryable() {
    let source = yahoo(vec![Ok(HttpResponse::new(404, "{}"))]);

    let err = source
        .fetch_daily_prices(request(Ticker::Goog, "2024-01-01", "2024-01-05"))
        .await
        .expect_err("404");

    assert_eq!(err.kind(), SourceErrorKind::NotFound);
    assert!(!err.retryable());
}

#[tokio::test]
async fn persistent_outage_maps_to_unavailable_after_retries() {
    let source = yahoo(vec![
        Ok(HttpResponse::new(503, "busy")),
        Ok(HttpResponse::new(503, "busy")),
    ]);

    let err = source
        .fetch_daily_prices(request(Ticker::Goog, "2024-01-01", "2024-01-05"))
        .await
        .expect_err("still down");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert!(err.code().starts_with("source."));
}

#[tokio::test]
async fn transient_failure_recovers_within_retry_budget() {
    let source = yahoo(vec![
        Err(HttpError::timeout("slow")),
        Ok(HttpResponse::ok_json(CHART)),
    ]);

    let table = source
        .fetch_daily_prices(request(Ticker::Msft, "2024-01-01", "2024-01-05"))
        .await
        .expect("second attempt succeeds");

    assert_eq!(table.row_count(), 2);
}
