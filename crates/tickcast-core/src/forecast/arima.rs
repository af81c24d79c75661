use serde::Serialize;

use super::diff::{difference, integrate};
use super::estimate::starting_values;
use super::optimize::NelderMead;
use super::transform::{constrain_invertible, constrain_stationary};
use super::{ArimaOrder, FitError, ModelConfig};

/// ARIMA(p, d, q) estimated by conditional sum of squares.
///
/// Conditioning on the first `p` observations and zero pre-sample shocks
/// gives estimates close to, but not equal to, exact maximum likelihood.
/// Point forecasts therefore differ numerically from state-space ARIMA
/// implementations fitted on the same data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Arima {
    config: ModelConfig,
}

/// Estimated model state, sufficient to project forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedArima {
    pub order: ArimaOrder,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    /// Mean of the differenced series (zero when not estimated).
    pub mean: f64,
    /// Innovation variance estimate.
    pub sigma2: f64,
    pub observations: usize,
    pub iterations: usize,
    pub converged: bool,
    #[serde(skip)]
    recent_values: Vec<f64>,
    #[serde(skip)]
    recent_residuals: Vec<f64>,
    #[serde(skip)]
    tails: Vec<f64>,
}

impl Arima {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn fit(&self, data: &[f64]) -> Result<FittedArima, FitError> {
        let order = self.config.order;
        let ArimaOrder { p, d, q } = order;

        let required = order.min_observations();
        if data.len() < required {
            return Err(FitError::InsufficientData {
                order,
                required,
                actual: data.len(),
            });
        }
        if let Some(index) = data.iter().position(|value| !value.is_finite()) {
            return Err(FitError::NonFiniteInput { index });
        }

        let (differenced, tails) = difference(data, d);
        let mean = if self.config.include_mean {
            differenced.iter().sum::<f64>() / differenced.len() as f64
        } else {
            0.0
        };
        let centered: Vec<f64> = differenced.iter().map(|value| value - mean).collect();

        let start = starting_values(&centered, p, q);
        let minimum = NelderMead::new(self.config.max_iterations, self.config.tolerance).minimize(
            |params| {
                let (ar, ma) = coefficients(params, p);
                conditional_sum_of_squares(&centered, &ar, &ma)
            },
            &start,
        );

        let (ar, ma) = coefficients(&minimum.point, p);
        let residuals = residuals(&centered, &ar, &ma);
        let css: f64 = residuals[p..].iter().map(|e| e * e).sum();
        let sigma2 = css / (centered.len() - p) as f64;

        if !ar.iter().chain(&ma).all(|value| value.is_finite()) {
            return Err(FitError::NonFiniteEstimate {
                quantity: "coefficient",
            });
        }
        if !mean.is_finite() {
            return Err(FitError::NonFiniteEstimate { quantity: "mean" });
        }
        if !sigma2.is_finite() {
            return Err(FitError::NonFiniteEstimate {
                quantity: "innovation variance",
            });
        }

        Ok(FittedArima {
            order,
            ar,
            ma,
            mean,
            sigma2,
            observations: data.len(),
            iterations: minimum.iterations,
            converged: minimum.converged,
            recent_values: centered[centered.len() - p..].to_vec(),
            recent_residuals: residuals[residuals.len() - q..].to_vec(),
            tails,
        })
    }
}

impl FittedArima {
    /// Project `steps` values past the end of the fitted data, on the
    /// original scale. Future shocks are taken at their expectation, zero.
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, FitError> {
        let mut values = self.recent_values.clone();
        let mut shocks = self.recent_residuals.clone();
        let mut increments = Vec::with_capacity(steps);

        for _ in 0..steps {
            let autoregressive: f64 = self
                .ar
                .iter()
                .zip(values.iter().rev())
                .map(|(phi, value)| phi * value)
                .sum();
            let moving_average: f64 = self
                .ma
                .iter()
                .zip(shocks.iter().rev())
                .map(|(theta, shock)| theta * shock)
                .sum();
            let next = autoregressive + moving_average;
            values.push(next);
            shocks.push(0.0);
            increments.push(next + self.mean);
        }

        let levels = integrate(&increments, &self.tails);
        match levels.iter().position(|value| !value.is_finite()) {
            Some(index) => Err(FitError::DivergentForecast { step: index + 1 }),
            None => Ok(levels),
        }
    }
}

fn coefficients(params: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let (ar, ma) = params.split_at(p);
    (constrain_stationary(ar), constrain_invertible(ma))
}

/// One-step prediction errors, conditioning on the first `p` observations
/// and on zero pre-sample shocks.
fn residuals(data: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut errors = vec![0.0; data.len()];
    for t in p..data.len() {
        let mut predicted = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            predicted += phi * data[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                predicted += theta * errors[t - 1 - j];
            }
        }
        errors[t] = data[t] - predicted;
    }
    errors
}

fn conditional_sum_of_squares(data: &[f64], ar: &[f64], ma: &[f64]) -> f64 {
    residuals(data, ar, ma)[ar.len()..]
        .iter()
        .map(|e| e * e)
        .sum()
}
