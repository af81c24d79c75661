//! Raw, date-indexed price tables as delivered by price sources.
//!
//! The layout is deliberately loose: labels may be flat (`"Close"`) or
//! composite (`("Close", "GOOG")`), dates may be typed or text, and any
//! cell may be missing. [`SeriesNormalizer`](crate::SeriesNormalizer) turns
//! a table into a [`PriceSeries`](crate::PriceSeries).

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{DailyBar, Ticker, TradingDate, ValidationError};

/// Column label, either a single name or hierarchical parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnLabel {
    Flat(String),
    Composite(Vec<String>),
}

impl ColumnLabel {
    pub fn flat(name: impl Into<String>) -> Self {
        Self::Flat(name.into())
    }

    pub fn composite<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Composite(parts.into_iter().map(Into::into).collect())
    }

    /// Single-string form; composite parts are trimmed, empty parts are
    /// skipped and the rest joined with `separator`.
    pub fn flatten(&self, separator: &str) -> String {
        match self {
            Self::Flat(name) => name.trim().to_owned(),
            Self::Composite(parts) => parts
                .iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(separator),
        }
    }
}

impl Display for ColumnLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.flatten(" "))
    }
}

/// Row key, typed or as text still to be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Date(TradingDate),
    Text(String),
}

impl RawDate {
    pub fn resolve(&self) -> Result<TradingDate, ValidationError> {
        match self {
            Self::Date(date) => Ok(*date),
            Self::Text(text) => TradingDate::parse(text),
        }
    }
}

impl From<TradingDate> for RawDate {
    fn from(value: TradingDate) -> Self {
        Self::Date(value)
    }
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawDate {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub label: ColumnLabel,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed table of price fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPriceTable {
    index: Vec<RawDate>,
    columns: Vec<RawColumn>,
}

impl RawPriceTable {
    pub fn new<I, D>(index: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<RawDate>,
    {
        Self {
            index: index.into_iter().map(Into::into).collect(),
            columns: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a column; its length must match the index.
    pub fn with_column(
        mut self,
        label: ColumnLabel,
        values: Vec<Option<f64>>,
    ) -> Result<Self, ValidationError> {
        if values.len() != self.index.len() {
            return Err(ValidationError::ColumnLengthMismatch {
                label: label.flatten(" "),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        self.columns.push(RawColumn { label, values });
        Ok(self)
    }

    /// Table in the multi-level layout `(field, ticker)` used by common
    /// market-data downloaders.
    pub fn from_bars(ticker: Ticker, bars: &[DailyBar]) -> Self {
        let label = |field: &str| ColumnLabel::composite([field, ticker.as_str()]);
        let column = |field: &str, pick: fn(&DailyBar) -> Option<f64>| RawColumn {
            label: label(field),
            values: bars.iter().map(pick).collect(),
        };

        let mut columns = vec![
            column("Open", |bar| bar.open),
            column("High", |bar| bar.high),
            column("Low", |bar| bar.low),
            column("Close", |bar| bar.close),
        ];
        if bars.iter().any(|bar| bar.adj_close.is_some()) {
            columns.push(column("Adj Close", |bar| bar.adj_close));
        }
        columns.push(column("Volume", |bar| bar.volume.map(|v| v as f64)));

        Self {
            index: bars.iter().map(|bar| RawDate::Date(bar.date)).collect(),
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[RawDate] {
        &self.index
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }
}
