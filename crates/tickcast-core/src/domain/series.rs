use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{TradingDate, ValidationError};

/// A dated price observation or estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub price: f64,
}

impl PricePoint {
    pub const fn new(date: TradingDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Non-empty closing-price history, strictly ascending by date with
/// positive finite prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        if points.is_empty() {
            return Err(ValidationError::EmptySeries);
        }
        for point in &points {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(ValidationError::InvalidPrice { date: point.date });
            }
        }
        ensure_ascending(&points)?;
        Ok(Self { points })
    }

    /// Build from `(date, close)` pairs, the typed alternative to sniffing a
    /// raw table.
    pub fn from_closes<I>(closes: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (TradingDate, f64)>,
    {
        Self::new(
            closes
                .into_iter()
                .map(|(date, price)| PricePoint::new(date, price))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.price).collect()
    }

    pub fn first(&self) -> PricePoint {
        self.points[0]
    }

    pub fn last(&self) -> PricePoint {
        self.points[self.points.len() - 1]
    }

    pub fn last_date(&self) -> TradingDate {
        self.last().date
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = ValidationError;

    fn try_from(value: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(value: PriceSeries) -> Self {
        value.points
    }
}

/// Projected prices on consecutive business days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct ForecastResult {
    points: Vec<PricePoint>,
}

impl ForecastResult {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for point in &points {
            if !point.price.is_finite() {
                return Err(ValidationError::NonFiniteForecast { date: point.date });
            }
            if !point.date.is_business_day() {
                return Err(ValidationError::WeekendForecastDate { date: point.date });
            }
        }
        for pair in points.windows(2) {
            let (previous, next) = (pair[0].date, pair[1].date);
            if previous.next_business_day() != Some(next) {
                return Err(ValidationError::ForecastGap { previous, next });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<TradingDate> {
        self.points.first().map(|point| point.date)
    }
}

impl TryFrom<Vec<PricePoint>> for ForecastResult {
    type Error = ValidationError;

    fn try_from(value: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ForecastResult> for Vec<PricePoint> {
    fn from(value: ForecastResult) -> Self {
        value.points
    }
}

/// Provenance of a combined-series entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesTag {
    Actual,
    Forecast,
}

impl SeriesTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Forecast => "forecast",
        }
    }
}

impl Display for SeriesTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedPoint {
    pub date: TradingDate,
    pub price: f64,
    pub tag: SeriesTag,
}

/// History followed by forecast, strictly ascending, built by
/// [`combine`](crate::combine).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedSeries {
    points: Vec<TaggedPoint>,
    actual_len: usize,
}

impl CombinedSeries {
    pub(crate) fn from_parts(points: Vec<TaggedPoint>, actual_len: usize) -> Self {
        Self { points, actual_len }
    }

    pub fn points(&self) -> &[TaggedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn actual(&self) -> &[TaggedPoint] {
        &self.points[..self.actual_len]
    }

    pub fn forecast(&self) -> &[TaggedPoint] {
        &self.points[self.actual_len..]
    }

    /// Separate the entries by tag back into their source series.
    pub fn split(&self) -> Result<(PriceSeries, ForecastResult), ValidationError> {
        let (actual, forecast): (Vec<&TaggedPoint>, Vec<&TaggedPoint>) = self
            .points
            .iter()
            .partition(|point| point.tag == SeriesTag::Actual);

        let history = PriceSeries::new(
            actual
                .into_iter()
                .map(|point| PricePoint::new(point.date, point.price))
                .collect(),
        )?;
        let projection = ForecastResult::new(
            forecast
                .into_iter()
                .map(|point| PricePoint::new(point.date, point.price))
                .collect(),
        )?;
        Ok((history, projection))
    }
}

fn ensure_ascending(points: &[PricePoint]) -> Result<(), ValidationError> {
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(ValidationError::UnorderedDates {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    Ok(())
}
