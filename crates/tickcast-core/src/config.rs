//! Pipeline configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes:
//!
//! ```json
//! {
//!   "history": { "start": "2021-01-01", "end": "2024-06-30" },
//!   "model": { "order": { "p": 3, "d": 1, "q": 1 } },
//!   "horizon": { "min": 5, "max": 60 },
//!   "source": { "kind": "synthetic" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::macros::date;

use crate::{
    CoreError, DateWindow, HorizonBounds, ModelConfig, SeriesNormalizer, SourceId, TradingDate,
    ValidationError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Inclusive history window requested from the source.
    pub history: DateWindow,
    pub model: ModelConfig,
    pub horizon: HorizonBounds,
    pub normalizer: SeriesNormalizer,
    pub source: SourceConfig,
}

/// Which source to use and how patiently to talk to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceId,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceId::Yahoo,
            timeout_ms: 10_000,
            max_retries: 3,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history: DateWindow {
                start: TradingDate::new(date!(2020 - 01 - 01)),
                end: TradingDate::new(date!(2024 - 12 - 31)),
            },
            model: ModelConfig::default(),
            horizon: HorizonBounds::default(),
            normalizer: SeriesNormalizer::default(),
            source: SourceConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Replace either end of the history window, keeping it ordered.
    pub fn with_window(
        mut self,
        start: Option<TradingDate>,
        end: Option<TradingDate>,
    ) -> Result<Self, ValidationError> {
        self.history = DateWindow::new(
            start.unwrap_or(self.history.start),
            end.unwrap_or(self.history.end),
        )?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        DateWindow::new(self.history.start, self.history.end)?;
        self.model.validate()?;
        self.horizon.validate()?;
        if self.source.timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: String::from("source.timeout_ms must be greater than zero"),
            });
        }
        Ok(())
    }
}
