use serde::{Deserialize, Serialize};

use crate::TradingDate;

/// One daily OHLCV row as delivered by a price source. Any field may be
/// missing; cleaning happens in the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradingDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl DailyBar {
    pub fn new(
        date: TradingDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<u64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            adj_close: None,
            volume,
        }
    }

    pub fn with_adj_close(mut self, adj_close: Option<f64>) -> Self {
        self.adj_close = adj_close;
        self
    }

    /// Bar with every price field set to `close`.
    pub fn flat(date: TradingDate, close: f64) -> Self {
        Self::new(date, Some(close), Some(close), Some(close), Some(close), None)
    }
}
