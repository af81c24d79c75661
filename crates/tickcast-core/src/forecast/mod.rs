//! # Forecast Engine
//!
//! Fixed-order ARIMA fitting and multi-step projection.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `arima` | ARIMA(p, d, q) fit by conditional sum of squares |
//! | `diff` | Differencing and re-integration |
//! | `estimate` | Yule-Walker and Hannan-Rissanen starting values |
//! | `transform` | Stationarity/invertibility reparameterisation |
//! | `optimize` | Nelder-Mead simplex minimiser |
//! | `engine` | Dated forecasts over a [`PriceSeries`](crate::PriceSeries) |
//!
//! The order defaults to (5, 1, 2) and is configuration, never tuned per
//! request.

mod arima;
mod diff;
mod engine;
mod estimate;
mod linalg;
mod optimize;
mod transform;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ValidationError;

pub use arima::{Arima, FittedArima};
pub use diff::{difference, integrate};
pub use engine::{FittedModel, ForecastEngine, ModelSummary};
pub use optimize::{Minimum, NelderMead};

/// Autoregressive, differencing and moving-average orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub const MAX_AR: usize = 10;
    pub const MAX_DIFF: usize = 2;
    pub const MAX_MA: usize = 10;

    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    pub fn validate(self) -> Result<Self, ValidationError> {
        let reason = if self.p > Self::MAX_AR {
            format!("AR order {} must be <= {}", self.p, Self::MAX_AR)
        } else if self.d > Self::MAX_DIFF {
            format!("differencing order {} must be <= {}", self.d, Self::MAX_DIFF)
        } else if self.q > Self::MAX_MA {
            format!("MA order {} must be <= {}", self.q, Self::MAX_MA)
        } else {
            return Ok(self);
        };
        Err(ValidationError::InvalidModelOrder { reason })
    }

    /// Observations needed to identify the model: strictly more than
    /// `p + d + q`.
    pub const fn min_observations(self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(5, 1, 2)
    }
}

impl Display for ArimaOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// Model settings shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub order: ArimaOrder,
    /// Estimate a mean for the differenced series (a drift term when d > 0).
    /// Off by default, so an integrated model forecasts without a trend.
    pub include_mean: bool,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            include_mean: false,
            max_iterations: 2_000,
            tolerance: 1e-8,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.order.validate()?;
        if self.max_iterations == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: String::from("model.max_iterations must be greater than zero"),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ValidationError::InvalidConfig {
                reason: String::from("model.tolerance must be a positive number"),
            });
        }
        Ok(())
    }
}

/// Numerical failure while fitting or projecting a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("ARIMA{order} needs at least {required} observations, got {actual}")]
    InsufficientData {
        order: ArimaOrder,
        required: usize,
        actual: usize,
    },
    #[error("observation {index} is not a finite number")]
    NonFiniteInput { index: usize },
    #[error("estimation produced a non-finite {quantity}")]
    NonFiniteEstimate { quantity: &'static str },
    #[error("projection diverged at step {step}")]
    DivergentForecast { step: usize },
}
