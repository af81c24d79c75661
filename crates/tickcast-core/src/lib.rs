//! # Tickcast Core
//!
//! Short-horizon closing-price forecasts for a fixed set of equities.
//!
//! ## Overview
//!
//! A forecast is one pass through four stages:
//!
//! - **Source**: fetch a date-indexed [`RawPriceTable`] for a ticker and window
//! - **Normalizer**: extract a clean, ascending [`PriceSeries`] of closes
//! - **Forecast engine**: fit ARIMA(5,1,2) and project business-day prices
//! - **Combiner**: join history and forecast into a tagged [`CombinedSeries`]
//!
//! The stages after the source are synchronous, pure and do no logging.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`combine`](mod@combine) | History + forecast concatenation with overlap check |
//! | [`config`] | Pipeline configuration and JSON loading |
//! | [`domain`] | Tickers, trading dates, horizons, price series |
//! | [`error`] | Core error types |
//! | [`forecast`] | ARIMA estimation and projection |
//! | [`normalize`] | Close-column extraction and cleaning |
//! | [`pipeline`] | The end-to-end `run_forecast` call |
//! | [`source`] | Price source trait, Yahoo and synthetic sources |
//! | [`table`] | Raw price tables with flat or composite labels |
//! | [`view`] | Chart-ready presentation of a result |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickcast_core::{ForecastPipeline, ForecastView, PipelineConfig, Ticker, YahooPriceSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = ForecastPipeline::new(YahooPriceSource::new(), PipelineConfig::default())?;
//!
//!     let result = pipeline.run_forecast(Ticker::Goog, 30).await;
//!     let view = ForecastView::from_result(&result);
//!     println!("{}", view.message.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every stage fails fast with a typed error and nothing is retried inside
//! the core:
//!
//! ```rust
//! use tickcast_core::{ForecastError, RawPriceTable, SeriesNormalizer};
//!
//! let err = SeriesNormalizer::default()
//!     .normalize(&RawPriceTable::empty())
//!     .unwrap_err();
//! assert!(matches!(err, ForecastError::EmptyData { .. }));
//! ```

pub mod combine;
pub mod config;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod table;
pub mod view;

// Stages
pub use combine::combine;
pub use normalize::SeriesNormalizer;
pub use pipeline::{ForecastOutcome, ForecastPipeline, ForecastRequest};

// Configuration
pub use config::{PipelineConfig, SourceConfig};

// Domain models
pub use domain::{
    CombinedSeries, DailyBar, DateWindow, ForecastResult, Horizon, HorizonBounds, PricePoint,
    PriceSeries, SeriesTag, TaggedPoint, Ticker, TradingDate,
};

// Error types
pub use error::{CoreError, ForecastError, PipelineError, ValidationError};

// Forecasting
pub use forecast::{
    ArimaOrder, FitError, FittedModel, ForecastEngine, ModelConfig, ModelSummary,
};

// Sources
pub use source::{
    Backoff, DailyPricesRequest, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse,
    LabelLayout, PriceSource, ReqwestHttpClient, RetryConfig, SourceError, SourceErrorKind,
    SourceId, SyntheticPriceSource, YahooPriceSource,
};

// Raw tables
pub use table::{ColumnLabel, RawColumn, RawDate, RawPriceTable};

// Presentation
pub use view::{ChartPoint, ForecastView};
