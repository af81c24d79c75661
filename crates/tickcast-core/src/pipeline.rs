//! The forecast pipeline: fetch, normalize, fit and project, combine.
//!
//! Each call is a single independent pass. Nothing is cached between calls
//! and no state is shared, so one pipeline value can serve concurrent
//! requests.

use serde::Serialize;

use crate::{
    combine, CombinedSeries, DailyPricesRequest, ForecastEngine, ForecastResult, Horizon,
    HorizonBounds, ModelSummary, PipelineConfig, PipelineError, PriceSeries, PriceSource,
    RawPriceTable, SeriesNormalizer, Ticker, ValidationError,
};

/// A validated ticker and horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastRequest {
    pub ticker: Ticker,
    pub horizon: Horizon,
}

impl ForecastRequest {
    pub fn new(
        ticker: Ticker,
        horizon_days: usize,
        bounds: &HorizonBounds,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            ticker,
            horizon: bounds.horizon(horizon_days)?,
        })
    }
}

/// Everything produced by one successful pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub ticker: Ticker,
    pub horizon: Horizon,
    pub historical: PriceSeries,
    pub forecast: ForecastResult,
    pub combined: CombinedSeries,
    pub model: ModelSummary,
}

pub struct ForecastPipeline<S> {
    source: S,
    config: PipelineConfig,
    normalizer: SeriesNormalizer,
    engine: ForecastEngine,
}

impl<S: PriceSource> ForecastPipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let engine = ForecastEngine::new(config.model)?;
        Ok(Self {
            source,
            normalizer: config.normalizer.clone(),
            config,
            engine,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one pass for `ticker` and `horizon_days`, the latter checked
    /// against the configured horizon bounds.
    pub async fn run_forecast(
        &self,
        ticker: Ticker,
        horizon_days: usize,
    ) -> Result<ForecastOutcome, PipelineError> {
        let request = ForecastRequest::new(ticker, horizon_days, &self.config.horizon)?;
        self.run(request).await
    }

    pub async fn run(&self, request: ForecastRequest) -> Result<ForecastOutcome, PipelineError> {
        let table = self.fetch(request.ticker).await?;
        self.process(request, &table)
    }

    /// Fetch and normalize only.
    pub async fn history(&self, ticker: Ticker) -> Result<PriceSeries, PipelineError> {
        let table = self.fetch(ticker).await?;
        Ok(self.normalizer.normalize(&table)?)
    }

    /// The synchronous part of a pass, over an already fetched table.
    pub fn process(
        &self,
        request: ForecastRequest,
        table: &RawPriceTable,
    ) -> Result<ForecastOutcome, PipelineError> {
        let historical = self.normalizer.normalize(table)?;
        let fitted = self.engine.fit(&historical)?;
        let forecast = fitted.project(request.horizon)?;
        let combined = combine(&historical, &forecast)?;

        Ok(ForecastOutcome {
            ticker: request.ticker,
            horizon: request.horizon,
            historical,
            forecast,
            combined,
            model: fitted.summary(),
        })
    }

    async fn fetch(&self, ticker: Ticker) -> Result<RawPriceTable, PipelineError> {
        let request = DailyPricesRequest::new(ticker, self.config.history);
        Ok(self.source.fetch_daily_prices(request).await?)
    }
}
