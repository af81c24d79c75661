use serde::Serialize;

use crate::{ForecastOutcome, PipelineError, PriceSeries, SeriesTag, TradingDate};

/// One point of a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: TradingDate,
    pub price: f64,
    pub tag: SeriesTag,
}

/// Chart-ready rendering of a pipeline result: the historical series, the
/// combined series and a status line. A failed run carries empty series and
/// the error's user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub title: String,
    pub historical: Vec<ChartPoint>,
    pub combined: Vec<ChartPoint>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl ForecastView {
    pub fn from_result(result: &Result<ForecastOutcome, PipelineError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(error) => Self::from_error(error),
        }
    }

    pub fn from_outcome(outcome: &ForecastOutcome) -> Self {
        let combined = outcome
            .combined
            .points()
            .iter()
            .map(|point| ChartPoint {
                date: point.date,
                price: point.price,
                tag: point.tag,
            })
            .collect();

        let forecast = outcome.forecast.points();
        let message = match (forecast.first(), forecast.last()) {
            (Some(first), Some(last)) => format!(
                "{} business-day forecast for {} from {} to {}",
                outcome.horizon,
                outcome.ticker.display_label(),
                first.date,
                last.date
            ),
            _ => format!("No forecast for {}", outcome.ticker.display_label()),
        };

        Self {
            title: format!("{} closing price", outcome.ticker.display_label()),
            historical: Self::history_points(&outcome.historical),
            combined,
            message: Some(message),
            error_code: None,
        }
    }

    pub fn from_error(error: &PipelineError) -> Self {
        Self {
            title: String::from("Forecast unavailable"),
            historical: Vec::new(),
            combined: Vec::new(),
            message: Some(error.user_message()),
            error_code: Some(error.code()),
        }
    }

    pub fn history_points(series: &PriceSeries) -> Vec<ChartPoint> {
        series
            .points()
            .iter()
            .map(|point| ChartPoint {
                date: point.date,
                price: point.price,
                tag: SeriesTag::Actual,
            })
            .collect()
    }

    pub fn is_error(&self) -> bool {
        self.error_code.is_some()
    }
}
