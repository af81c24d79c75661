//! # Domain Models
//!
//! Canonical domain types for tickcast.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Supported equity symbol |
//! | [`TradingDate`] | Calendar date with business-day navigation |
//! | [`DateWindow`] | Inclusive history request range |
//! | [`Horizon`] | Forecast length in business days (1..=90) |
//! | [`HorizonBounds`] | Request-level horizon limits |
//! | [`DailyBar`] | Raw OHLCV row from a price source |
//! | [`PriceSeries`] | Cleaned closing prices |
//! | [`ForecastResult`] | Projected prices on future business days |
//! | [`CombinedSeries`] | History and forecast tagged by provenance |
//!
//! ## Validation
//!
//! Series types enforce their ordering invariants at construction time:
//!
//! ```rust
//! use tickcast_core::{PriceSeries, TradingDate, ValidationError};
//!
//! let day = TradingDate::parse("2024-01-02").unwrap();
//! let err = PriceSeries::from_closes([(day, 10.0), (day, 11.0)]).unwrap_err();
//! assert!(matches!(err, ValidationError::UnorderedDates { .. }));
//! ```

mod bar;
mod date;
mod horizon;
mod series;
mod ticker;

pub use bar::DailyBar;
pub use date::{DateWindow, TradingDate};
pub use horizon::{Horizon, HorizonBounds};
pub use series::{
    CombinedSeries, ForecastResult, PricePoint, PriceSeries, SeriesTag, TaggedPoint,
};
pub use ticker::Ticker;
