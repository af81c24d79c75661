use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    DailyPricesRequest, HttpClient, HttpRequest, HttpResponse, PriceSource, ReqwestHttpClient,
    RetryConfig, SourceError, SourceId,
};
use crate::{DailyBar, RawPriceTable, Ticker, TradingDate};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Daily history from the Yahoo Finance chart endpoint.
///
/// Rows come back as a composite-labelled table, `("Close", "GOOG")` and so
/// on. Transient failures (408, 429, 5xx, timeouts, refused connections) are
/// retried according to the configured [`RetryConfig`].
#[derive(Clone)]
pub struct YahooPriceSource {
    http_client: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
    base_url: String,
}

impl Default for YahooPriceSource {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            retry: RetryConfig::default(),
            timeout_ms: 10_000,
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Chart URL for the request; the window end is inclusive, so `period2`
    /// is midnight of the following day.
    pub fn chart_url(&self, request: &DailyPricesRequest) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(request.ticker.as_str()),
            request.window.start.unix_midnight(),
            request.window.end.next_day().unix_midnight(),
        )
    }

    async fn fetch(&self, request: DailyPricesRequest) -> Result<RawPriceTable, SourceError> {
        let started = Instant::now();
        let url = self.chart_url(&request);
        debug!(ticker = %request.ticker, url = %url, "requesting yahoo chart");

        let body = self.fetch_body(&url, request.ticker).await?;
        let bars = parse_chart(&body)?;
        let total = bars.len();
        let bars: Vec<DailyBar> = bars
            .into_iter()
            .filter(|bar| request.window.contains(bar.date))
            .collect();
        if bars.len() < total {
            debug!(
                ticker = %request.ticker,
                dropped = total - bars.len(),
                "dropped rows outside the requested window"
            );
        }

        debug!(
            ticker = %request.ticker,
            rows = bars.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "yahoo chart received"
        );
        Ok(RawPriceTable::from_bars(request.ticker, &bars))
    }

    async fn fetch_body(&self, url: &str, ticker: Ticker) -> Result<String, SourceError> {
        let mut attempt = 0;
        loop {
            let request = HttpRequest::get(url)
                .with_header("accept", "application/json")
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(self.timeout_ms);

            let (retry, error) = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => (
                    self.retry.should_retry_status(response.status),
                    status_error(ticker, &response),
                ),
                Err(error) => (
                    self.retry.should_retry_error(&error),
                    SourceError::unavailable(format!("yahoo transport error: {}", error.message())),
                ),
            };

            if !retry || attempt >= self.retry.max_retries {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                ticker = %ticker,
                attempt = attempt + 1,
                max_retries = self.retry.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying yahoo chart request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl PriceSource for YahooPriceSource {
    fn id(&self) -> SourceId {
        SourceId::Yahoo
    }

    fn fetch_daily_prices<'a>(
        &'a self,
        request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch(request))
    }
}

fn status_error(ticker: Ticker, response: &HttpResponse) -> SourceError {
    let detail = serde_json::from_str::<YahooChartResponse>(&response.body)
        .ok()
        .and_then(|chart| chart.chart.error)
        .map(|error| error.description)
        .unwrap_or_default();

    match response.status {
        404 => SourceError::not_found(format!("yahoo has no chart for {ticker}: {detail}")),
        429 => SourceError::rate_limited("yahoo rate limit exceeded"),
        500..=599 => SourceError::unavailable(format!(
            "yahoo returned status {}",
            response.status
        )),
        status => SourceError::invalid_response(format!(
            "yahoo returned status {status} for {ticker}: {detail}"
        )),
    }
}

/// Bars from a chart body. A result without timestamps (no trading days in
/// the window) yields no bars rather than an error.
fn parse_chart(body: &str) -> Result<Vec<DailyBar>, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid_response(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = response.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("not found") {
            SourceError::not_found(error.description)
        } else {
            SourceError::unavailable(format!(
                "yahoo chart API error: {} ({})",
                error.description, error.code
            ))
        });
    }

    let result = response
        .chart
        .result
        .into_iter()
        .flatten()
        .next()
        .ok_or_else(|| SourceError::invalid_response("no chart result in response"))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|series| series.adjclose)
        .unwrap_or_default();
    let offset = result.meta.gmtoffset;

    result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| {
            let date = TradingDate::from_unix_timestamp(timestamp, offset)
                .map_err(|e| SourceError::invalid_response(e.to_string()))?;
            Ok(DailyBar::new(
                date,
                value_at(&quote.open, i),
                value_at(&quote.high, i),
                value_at(&quote.low, i),
                value_at(&quote.close, i),
                quote.volume.get(i).copied().flatten(),
            )
            .with_adj_close(value_at(&adjclose, i)))
        })
        .collect()
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
