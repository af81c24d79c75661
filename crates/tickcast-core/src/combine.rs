use crate::{
    CombinedSeries, ForecastError, ForecastResult, PricePoint, PriceSeries, SeriesTag, TaggedPoint,
};

/// Append `forecast` to `history`, tagging each entry with its provenance.
///
/// # Errors
///
/// [`ForecastError::Overlap`] when the first forecast date is not strictly
/// after the last historical date.
pub fn combine(
    history: &PriceSeries,
    forecast: &ForecastResult,
) -> Result<CombinedSeries, ForecastError> {
    let last_actual = history.last_date();
    if let Some(first_forecast) = forecast.first_date() {
        if first_forecast <= last_actual {
            return Err(ForecastError::Overlap {
                last_actual,
                first_forecast,
            });
        }
    }

    let points: Vec<TaggedPoint> = history
        .points()
        .iter()
        .map(|point| tagged(point, SeriesTag::Actual))
        .chain(
            forecast
                .points()
                .iter()
                .map(|point| tagged(point, SeriesTag::Forecast)),
        )
        .collect();

    Ok(CombinedSeries::from_parts(points, history.len()))
}

fn tagged(point: &PricePoint, tag: SeriesTag) -> TaggedPoint {
    TaggedPoint {
        date: point.date,
        price: point.price,
        tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDate;

    fn date(value: &str) -> TradingDate {
        TradingDate::parse(value).expect("valid date")
    }

    fn history() -> PriceSeries {
        PriceSeries::from_closes([
            (date("2024-12-27"), 10.0),
            (date("2024-12-30"), 11.0),
            (date("2024-12-31"), 12.0),
        ])
        .expect("valid history")
    }

    fn forecast(start: &str, prices: &[f64]) -> ForecastResult {
        let mut day = date(start);
        let mut points = Vec::new();
        for &price in prices {
            points.push(PricePoint::new(day, price));
            day = day.next_business_day().expect("in range");
        }
        ForecastResult::new(points).expect("valid forecast")
    }

    #[test]
    fn concatenates_and_tags() {
        let history = history();
        let forecast = forecast("2025-01-01", &[12.5, 13.0]);

        let combined = combine(&history, &forecast).expect("disjoint ranges");

        assert_eq!(combined.len(), history.len() + forecast.len());
        assert!(combined.actual().iter().all(|p| p.tag == SeriesTag::Actual));
        assert!(combined.forecast().iter().all(|p| p.tag == SeriesTag::Forecast));
        assert!(combined
            .points()
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn split_reproduces_inputs() {
        let history = history();
        let forecast = forecast("2025-01-01", &[12.5, 13.0, 13.5]);

        let combined = combine(&history, &forecast).expect("disjoint ranges");
        let (actual, projected) = combined.split().expect("valid parts");

        assert_eq!(actual, history);
        assert_eq!(projected, forecast);
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let err = combine(&history(), &forecast("2024-12-31", &[1.0])).expect_err("overlap");
        assert_eq!(
            err,
            ForecastError::Overlap {
                last_actual: date("2024-12-31"),
                first_forecast: date("2024-12-31"),
            }
        );
    }

    #[test]
    fn empty_forecast_keeps_history_only() {
        let empty = ForecastResult::new(Vec::new()).expect("empty forecast is valid");
        let combined = combine(&history(), &empty).expect("nothing to overlap");
        assert_eq!(combined.len(), 3);
        assert!(combined.forecast().is_empty());
    }
}
