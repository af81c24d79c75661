use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::{DailyPricesRequest, PriceSource, SourceError, SourceId};
use crate::{ColumnLabel, DailyBar, RawPriceTable, Ticker};

/// Column labelling used by [`SyntheticPriceSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelLayout {
    /// `Open`, `High`, `Low`, `Close`, `Volume`.
    Flat,
    /// `("Close", "GOOG")` and so on.
    #[default]
    Composite,
}

/// Offline source producing a seeded random walk over the business days of
/// the requested window. Identical requests yield identical tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticPriceSource {
    layout: LabelLayout,
    /// Blank the close of every n-th row.
    missing_every: Option<usize>,
}

impl SyntheticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LabelLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_missing_every(mut self, every: usize) -> Self {
        self.missing_every = (every > 0).then_some(every);
        self
    }

    pub fn table(&self, request: &DailyPricesRequest) -> Result<RawPriceTable, SourceError> {
        let bars = self.bars(request);
        match self.layout {
            LabelLayout::Composite => Ok(RawPriceTable::from_bars(request.ticker, &bars)),
            LabelLayout::Flat => {
                let pick =
                    |field: fn(&DailyBar) -> Option<f64>| bars.iter().map(field).collect::<Vec<_>>();
                RawPriceTable::new(bars.iter().map(|bar| bar.date))
                    .with_column(ColumnLabel::flat("Open"), pick(|bar| bar.open))
                    .and_then(|table| table.with_column(ColumnLabel::flat("High"), pick(|bar| bar.high)))
                    .and_then(|table| table.with_column(ColumnLabel::flat("Low"), pick(|bar| bar.low)))
                    .and_then(|table| {
                        table.with_column(ColumnLabel::flat("Close"), pick(|bar| bar.close))
                    })
                    .and_then(|table| {
                        table.with_column(
                            ColumnLabel::flat("Volume"),
                            pick(|bar| bar.volume.map(|volume| volume as f64)),
                        )
                    })
                    .map_err(|e| SourceError::internal(e.to_string()))
            }
        }
    }

    fn bars(&self, request: &DailyPricesRequest) -> Vec<DailyBar> {
        let mut rng = fastrand::Rng::with_seed(ticker_seed(request.ticker));
        let mut close = starting_price(request.ticker);

        request
            .window
            .business_days()
            .into_iter()
            .enumerate()
            .map(|(row, date)| {
                let open = close;
                let step = 0.0004 + 0.03 * (rng.f64() - 0.5);
                close = (open * (1.0 + step)).max(1.0);
                let high = open.max(close) * (1.0 + 0.005 * rng.f64());
                let low = open.min(close) * (1.0 - 0.005 * rng.f64());
                let volume = 10_000_000 + rng.u64(0..20_000_000);

                let blank = self
                    .missing_every
                    .is_some_and(|every| (row + 1) % every == 0);
                DailyBar::new(
                    date,
                    Some(round_cents(open)),
                    Some(round_cents(high)),
                    Some(round_cents(low)),
                    (!blank).then(|| round_cents(close)),
                    Some(volume),
                )
            })
            .collect()
    }
}

impl PriceSource for SyntheticPriceSource {
    fn id(&self) -> SourceId {
        SourceId::Synthetic
    }

    fn fetch_daily_prices<'a>(
        &'a self,
        request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.table(&request) })
    }
}

fn ticker_seed(ticker: Ticker) -> u64 {
    ticker
        .as_str()
        .bytes()
        .fold(5381_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(u64::from(byte)))
}

const fn starting_price(ticker: Ticker) -> f64 {
    match ticker {
        Ticker::Goog => 68.0,
        Ticker::Msft => 158.0,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
