use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of a daily observation, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` date. Timestamps such as `2024-01-02T00:00:00Z`
    /// or `2024-01-02 00:00:00` are accepted and truncated to their date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        let date_part = match trimmed.char_indices().nth(10) {
            Some((index, 'T' | ' ')) => &trimmed[..index],
            Some(_) => return Err(invalid()),
            None => trimmed,
        };

        Date::parse(date_part, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Date of a unix timestamp after applying an exchange offset in seconds.
    pub fn from_unix_timestamp(seconds: i64, offset_seconds: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(seconds.saturating_add(offset_seconds))
            .map(|value| Self(value.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: seconds.to_string(),
            })
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    /// Unix timestamp of midnight UTC on this date.
    pub fn unix_midnight(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_business_day(self) -> bool {
        !matches!(self.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    pub fn next_day(self) -> Self {
        Self(self.0.saturating_add(Duration::days(1)))
    }

    /// First Monday-Friday date strictly after this one, or `None` past the
    /// last representable date.
    pub fn next_business_day(self) -> Option<Self> {
        let step = match self.weekday() {
            Weekday::Friday => 3,
            Weekday::Saturday => 2,
            _ => 1,
        };
        self.0.checked_add(Duration::days(step)).map(Self)
    }

    /// `count` consecutive business days starting at the first business day
    /// strictly after `self`.
    pub fn business_days_after(self, count: usize) -> Result<Vec<Self>, ValidationError> {
        let mut dates = Vec::with_capacity(count);
        let mut cursor = self;
        for _ in 0..count {
            cursor = cursor
                .next_business_day()
                .ok_or(ValidationError::DateOutOfRange { after: cursor })?;
            dates.push(cursor);
        }
        Ok(dates)
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(DATE_FORMAT)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl FromStr for TradingDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Date> for TradingDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive range of calendar dates used to request history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateWindow")]
pub struct DateWindow {
    pub start: TradingDate,
    pub end: TradingDate,
}

#[derive(Deserialize)]
struct RawDateWindow {
    start: TradingDate,
    end: TradingDate,
}

impl TryFrom<RawDateWindow> for DateWindow {
    type Error = ValidationError;

    fn try_from(value: RawDateWindow) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl DateWindow {
    pub fn new(start: TradingDate, end: TradingDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: TradingDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Business days inside the window, in order.
    pub fn business_days(&self) -> Vec<TradingDate> {
        let mut days = Vec::new();
        let mut cursor = if self.start.is_business_day() {
            Some(self.start)
        } else {
            self.start.next_business_day()
        };
        while let Some(day) = cursor.filter(|day| *day <= self.end) {
            days.push(day);
            cursor = day.next_business_day();
        }
        days
    }
}
