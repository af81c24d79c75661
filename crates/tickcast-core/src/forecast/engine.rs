use serde::{Deserialize, Serialize};

use super::{Arima, ArimaOrder, FittedArima, ModelConfig};
use crate::{
    ForecastError, ForecastResult, Horizon, PricePoint, PriceSeries, TradingDate, ValidationError,
};

/// Fits the configured ARIMA model to a price series and projects it onto
/// the business days that follow the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForecastEngine {
    model: Arima,
}

/// A fitted model anchored to the last observed trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    model: FittedArima,
    include_mean: bool,
    last_date: TradingDate,
}

/// Serializable description of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub order: ArimaOrder,
    pub include_mean: bool,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub mean: f64,
    pub sigma2: f64,
    pub observations: usize,
    pub iterations: usize,
    pub converged: bool,
}

impl ForecastEngine {
    pub fn new(config: ModelConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            model: Arima::new(config),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        self.model.config()
    }

    /// Fit the model to the closing prices of `series`.
    pub fn fit(&self, series: &PriceSeries) -> Result<FittedModel, ForecastError> {
        let model = self.model.fit(&series.values())?;
        Ok(FittedModel {
            model,
            include_mean: self.config().include_mean,
            last_date: series.last_date(),
        })
    }

    /// Fit and project in one step.
    ///
    /// The result has exactly `horizon` points, dated on the consecutive
    /// business days after the last historical date.
    pub fn forecast(
        &self,
        series: &PriceSeries,
        horizon: Horizon,
    ) -> Result<ForecastResult, ForecastError> {
        self.fit(series)?.project(horizon)
    }
}

impl FittedModel {
    pub fn project(&self, horizon: Horizon) -> Result<ForecastResult, ForecastError> {
        let prices = self.model.forecast(horizon.days())?;
        let points = self
            .last_date
            .business_days_after(horizon.days())?
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PricePoint::new(date, price))
            .collect();
        Ok(ForecastResult::new(points)?)
    }

    pub fn last_date(&self) -> TradingDate {
        self.last_date
    }

    pub fn arima(&self) -> &FittedArima {
        &self.model
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            order: self.model.order,
            include_mean: self.include_mean,
            ar: self.model.ar.clone(),
            ma: self.model.ma.clone(),
            mean: self.model.mean,
            sigma2: self.model.sigma2,
            observations: self.model.observations,
            iterations: self.model.iterations,
            converged: self.model.converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::Weekday;

    use super::*;
    use crate::forecast::FitError;

    fn ramp(len: usize) -> PriceSeries {
        let start = TradingDate::parse("2021-12-31").expect("valid date");
        let dates = start.business_days_after(len).expect("in range");
        PriceSeries::from_closes(
            dates
                .into_iter()
                .enumerate()
                .map(|(i, date)| (date, 100.0 + i as f64)),
        )
        .expect("valid series")
    }

    #[test]
    fn horizon_past_last_calendar_date_is_rejected() {
        let window = crate::DateWindow::new(
            TradingDate::parse("9999-11-01").expect("valid date"),
            TradingDate::parse("9999-12-29").expect("valid date"),
        )
        .expect("ordered window");
        let series = PriceSeries::from_closes(
            window
                .business_days()
                .into_iter()
                .enumerate()
                .map(|(i, date)| (date, 50.0 + (i as f64 * 0.4).sin())),
        )
        .expect("valid series");

        let err = ForecastEngine::default()
            .forecast(&series, Horizon::new(7).expect("valid horizon"))
            .expect_err("only two business days remain");

        assert!(matches!(
            err,
            ForecastError::Validation(ValidationError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn forecast_has_requested_length_and_business_dates() {
        let series = ramp(500);
        for days in [7, 30] {
            let horizon = Horizon::new(days).expect("valid horizon");
            let forecast = ForecastEngine::default()
                .forecast(&series, horizon)
                .expect("forecast");

            assert_eq!(forecast.len(), days);
            let first = forecast.first_date().expect("non-empty");
            assert_eq!(Some(first), series.last_date().next_business_day());
            assert!(forecast
                .points()
                .iter()
                .all(|point| !matches!(point.date.weekday(), Weekday::Saturday | Weekday::Sunday)));
            assert!(forecast.points().iter().all(|point| point.price.is_finite()));
        }
    }

    #[test]
    fn short_series_is_a_model_fit_error() {
        let err = ForecastEngine::default()
            .forecast(&ramp(8), Horizon::new(7).expect("valid"))
            .expect_err("too short");
        assert!(matches!(
            err,
            ForecastError::ModelFit(FitError::InsufficientData { actual: 8, .. })
        ));
    }

    #[test]
    fn invalid_order_is_rejected_up_front() {
        let config = ModelConfig {
            order: ArimaOrder::new(1, 5, 0),
            ..ModelConfig::default()
        };
        assert!(matches!(
            ForecastEngine::new(config),
            Err(ValidationError::InvalidModelOrder { .. })
        ));
    }

    #[test]
    fn summary_reflects_fitted_order() {
        let fitted = ForecastEngine::default().fit(&ramp(60)).expect("fits");
        let summary = fitted.summary();
        assert_eq!(summary.order, ArimaOrder::default());
        assert_eq!(summary.ar.len(), 5);
        assert_eq!(summary.ma.len(), 2);
        assert_eq!(summary.observations, 60);
    }
}
