//! Close-column extraction and cleaning.

use serde::{Deserialize, Serialize};

use crate::{ForecastError, PricePoint, PriceSeries, RawColumn, RawPriceTable};

const CLOSE_NEEDLE: &str = "close";

/// Extracts a clean closing-price series from a [`RawPriceTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesNormalizer {
    /// Joins the parts of composite column labels before matching.
    pub label_separator: String,
}

impl Default for SeriesNormalizer {
    fn default() -> Self {
        Self {
            label_separator: String::from(" "),
        }
    }
}

impl SeriesNormalizer {
    pub fn with_separator(label_separator: impl Into<String>) -> Self {
        Self {
            label_separator: label_separator.into(),
        }
    }

    /// Locate the close column, drop missing rows, parse and order dates.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::EmptyData`] when the table has no rows or no
    ///   usable close values
    /// - [`ForecastError::MissingField`] when no label contains "close"
    /// - [`ForecastError::Validation`] when a date cannot be parsed
    pub fn normalize(&self, table: &RawPriceTable) -> Result<PriceSeries, ForecastError> {
        if table.is_empty() {
            return Err(ForecastError::empty_data("the price table has no rows"));
        }

        let column = self.close_column(table)?;

        let mut points = Vec::with_capacity(table.row_count());
        for (raw_date, value) in table.index().iter().zip(&column.values) {
            let Some(price) = value.filter(|price| price.is_finite() && *price > 0.0) else {
                continue;
            };
            points.push(PricePoint::new(raw_date.resolve()?, price));
        }

        if points.is_empty() {
            return Err(ForecastError::empty_data(format!(
                "all {} values of column '{}' are missing",
                table.row_count(),
                column.label.flatten(&self.label_separator)
            )));
        }

        // Stable sort, then keep the last row for any repeated date.
        points.sort_by_key(|point| point.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Ok(PriceSeries::new(deduped)?)
    }

    /// Labels containing "close" in any case; a label that starts with it
    /// wins over one like "Adj Close", otherwise the first match wins.
    fn close_column<'t>(&self, table: &'t RawPriceTable) -> Result<&'t RawColumn, ForecastError> {
        let flattened: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.label.flatten(&self.label_separator))
            .collect();

        let matches: Vec<usize> = flattened
            .iter()
            .enumerate()
            .filter(|(_, label)| label.to_lowercase().contains(CLOSE_NEEDLE))
            .map(|(position, _)| position)
            .collect();

        let chosen = matches
            .iter()
            .copied()
            .find(|&position| flattened[position].to_lowercase().starts_with(CLOSE_NEEDLE))
            .or_else(|| matches.first().copied());

        match chosen {
            Some(position) => Ok(&table.columns()[position]),
            None => Err(ForecastError::MissingField { columns: flattened }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnLabel, TradingDate, ValidationError};

    fn table(index: &[&str]) -> RawPriceTable {
        RawPriceTable::new(index.iter().copied())
    }

    #[test]
    fn empty_table_is_empty_data() {
        let err = SeriesNormalizer::default()
            .normalize(&RawPriceTable::empty())
            .expect_err("must fail");
        assert!(matches!(err, ForecastError::EmptyData { .. }));
    }

    #[test]
    fn table_without_close_is_missing_field() {
        let raw = table(&["2024-01-02"])
            .with_column(ColumnLabel::flat("Open"), vec![Some(1.0)])
            .expect("valid")
            .with_column(ColumnLabel::composite(["Volume", "GOOG"]), vec![Some(5.0)])
            .expect("valid");

        let err = SeriesNormalizer::default().normalize(&raw).expect_err("must fail");
        match err {
            ForecastError::MissingField { columns } => {
                assert_eq!(columns, ["Open", "Volume GOOG"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_missing_values_is_empty_data() {
        let raw = table(&["2024-01-02", "2024-01-03"])
            .with_column(ColumnLabel::flat("close"), vec![None, Some(f64::NAN)])
            .expect("valid");

        let err = SeriesNormalizer::default().normalize(&raw).expect_err("must fail");
        assert!(matches!(err, ForecastError::EmptyData { .. }));
    }

    #[test]
    fn prefers_close_over_adjusted_close() {
        let raw = table(&["2024-01-02"])
            .with_column(ColumnLabel::flat("Adj Close"), vec![Some(9.0)])
            .expect("valid")
            .with_column(ColumnLabel::flat("Close"), vec![Some(10.0)])
            .expect("valid");

        let series = SeriesNormalizer::default().normalize(&raw).expect("normalizes");
        assert_eq!(series.values(), [10.0]);
    }

    #[test]
    fn falls_back_to_any_label_containing_close() {
        let raw = table(&["2024-01-02"])
            .with_column(ColumnLabel::flat("Adj Close"), vec![Some(9.0)])
            .expect("valid");

        let series = SeriesNormalizer::default().normalize(&raw).expect("normalizes");
        assert_eq!(series.values(), [9.0]);
    }

    #[test]
    fn sorts_text_dates_and_keeps_last_duplicate() {
        let raw = table(&["2024-01-04", "2024-01-02T00:00:00Z", "2024-01-04"])
            .with_column(ColumnLabel::flat("CLOSE"), vec![Some(3.0), Some(1.0), Some(4.0)])
            .expect("valid");

        let series = SeriesNormalizer::default().normalize(&raw).expect("normalizes");
        let dates: Vec<String> = series.points().iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-04"]);
        assert_eq!(series.values(), [1.0, 4.0]);
    }

    #[test]
    fn unparsable_date_is_reported() {
        let raw = table(&["yesterday"])
            .with_column(ColumnLabel::flat("Close"), vec![Some(1.0)])
            .expect("valid");

        let err = SeriesNormalizer::default().normalize(&raw).expect_err("must fail");
        assert!(matches!(
            err,
            ForecastError::Validation(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn custom_separator_is_used_for_matching() {
        let day = TradingDate::parse("2024-01-02").expect("valid");
        let raw = RawPriceTable::new([day])
            .with_column(ColumnLabel::composite(["Clo", "se"]), vec![Some(2.0)])
            .expect("valid");

        assert!(SeriesNormalizer::default().normalize(&raw).is_err());
        let series = SeriesNormalizer::with_separator("")
            .normalize(&raw)
            .expect("joined label contains close");
        assert_eq!(series.len(), 1);
    }
}
