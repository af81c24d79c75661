use thiserror::Error;

use crate::forecast::FitError;
use crate::source::SourceError;
use crate::TradingDate;

/// Validation and contract errors exposed by `tickcast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported ticker '{value}', expected one of GOOG, MSFT")]
    UnknownTicker { value: String },

    #[error("horizon {value} is outside the allowed range {min}..={max}")]
    HorizonOutOfRange { value: usize, min: usize, max: usize },
    #[error("horizon bounds {min}..={max} must lie within 1..={limit}")]
    InvalidHorizonBounds { min: usize, max: usize, limit: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date window start {start} is after end {end}")]
    InvalidDateWindow { start: TradingDate, end: TradingDate },

    #[error("no business day is representable after {after}")]
    DateOutOfRange { after: TradingDate },

    #[error("price series must contain at least one observation")]
    EmptySeries,
    #[error("price on {date} must be finite and positive")]
    InvalidPrice { date: TradingDate },
    #[error("forecast value on {date} must be finite")]
    NonFiniteForecast { date: TradingDate },
    #[error("dates must be strictly increasing: {next} does not follow {previous}")]
    UnorderedDates {
        previous: TradingDate,
        next: TradingDate,
    },
    #[error("forecast date {date} falls on a weekend")]
    WeekendForecastDate { date: TradingDate },
    #[error("forecast dates must be consecutive business days: {next} does not follow {previous}")]
    ForecastGap {
        previous: TradingDate,
        next: TradingDate,
    },

    #[error("column '{label}' has {actual} values but the index has {expected} rows")]
    ColumnLengthMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid model order: {reason}")]
    InvalidModelOrder { reason: String },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Failures of the forecast core: normalize, fit/project, combine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("no usable historical data: {reason}")]
    EmptyData { reason: String },

    #[error("no column label contains 'close' (columns: {})", .columns.join(", "))]
    MissingField { columns: Vec<String> },

    #[error("model fit failed: {0}")]
    ModelFit(#[from] FitError),

    #[error("forecast starts on {first_forecast} but history ends on {last_actual}")]
    Overlap {
        last_actual: TradingDate,
        first_forecast: TradingDate,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ForecastError {
    pub fn empty_data(reason: impl Into<String>) -> Self {
        Self::EmptyData {
            reason: reason.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyData { .. } => "forecast.empty_data",
            Self::MissingField { .. } => "forecast.missing_field",
            Self::ModelFit(_) => "forecast.model_fit",
            Self::Overlap { .. } => "forecast.overlap",
            Self::Validation(_) => "forecast.invalid_input",
        }
    }
}

/// Top-level error returned by [`ForecastPipeline::run_forecast`](crate::ForecastPipeline::run_forecast).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("price source failed: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl PipelineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "request.invalid",
            Self::Source(error) => error.code(),
            Self::Forecast(error) => error.code(),
        }
    }

    /// Single-line message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => format!("Invalid request: {error}."),
            Self::Source(error) => format!(
                "Could not download price data ({}). Please try again later.",
                error.message()
            ),
            Self::Forecast(ForecastError::EmptyData { .. }) => {
                String::from("No price data is available for the selected ticker and period.")
            }
            Self::Forecast(ForecastError::MissingField { .. }) => {
                String::from("The downloaded data has no closing price column.")
            }
            Self::Forecast(ForecastError::ModelFit(error)) => {
                format!("The forecast model could not be fitted: {error}.")
            }
            Self::Forecast(error) => format!("Forecast failed: {error}."),
        }
    }
}

/// Serialization and configuration IO failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
