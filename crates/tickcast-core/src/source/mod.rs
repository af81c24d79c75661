//! Price source contract and adapters.
//!
//! | Source | Type | Description |
//! |--------|------|-------------|
//! | `yahoo` | [`YahooPriceSource`] | Yahoo Finance chart API over HTTP |
//! | `synthetic` | [`SyntheticPriceSource`] | Deterministic offline prices |
//!
//! Sources return a [`RawPriceTable`]; column layout and missing values are
//! left for the normalizer to deal with.

mod http_client;
mod retry;
mod synthetic;
mod yahoo;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DateWindow, RawPriceTable, Ticker, ValidationError};

pub use http_client::{HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use retry::{Backoff, RetryConfig};
pub use synthetic::{LabelLayout, SyntheticPriceSource};
pub use yahoo::YahooPriceSource;

/// Identifier of a price source implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Yahoo,
    Synthetic,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Synthetic => "synthetic",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "synthetic" => Ok(Self::Synthetic),
            _ => Err(ValidationError::InvalidConfig {
                reason: format!("unknown price source '{value}', expected yahoo or synthetic"),
            }),
        }
    }
}

/// Daily history request: one ticker over an inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPricesRequest {
    pub ticker: Ticker,
    pub window: DateWindow,
}

impl DailyPricesRequest {
    pub const fn new(ticker: Ticker, window: DateWindow) -> Self {
        Self { ticker, window }
    }
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    NotFound,
    InvalidResponse,
    Internal,
}

/// Structured error returned by a [`PriceSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Async contract implemented by every price source.
pub trait PriceSource: Send + Sync {
    fn id(&self) -> SourceId;

    fn fetch_daily_prices<'a>(
        &'a self,
        request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>>;
}

impl<S: PriceSource + ?Sized> PriceSource for Box<S> {
    fn id(&self) -> SourceId {
        (**self).id()
    }

    fn fetch_daily_prices<'a>(
        &'a self,
        request: DailyPricesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceTable, SourceError>> + Send + 'a>> {
        (**self).fetch_daily_prices(request)
    }
}
