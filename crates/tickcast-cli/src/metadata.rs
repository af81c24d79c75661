use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use tickcast_core::{DateWindow, SourceId, Ticker};

/// Request identifier (UUID v4) tying log lines to one command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Context emitted alongside every command's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub request_id: RequestId,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Ticker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon: Option<usize>,
    pub source: SourceId,
    pub window: DateWindow,
    pub latency_ms: u64,
}

impl Metadata {
    pub fn new(
        request_id: RequestId,
        command: &'static str,
        source: SourceId,
        window: DateWindow,
    ) -> Self {
        Self {
            request_id,
            generated_at: OffsetDateTime::now_utc(),
            command,
            ticker: None,
            horizon: None,
            source,
            window,
            latency_ms: 0,
        }
    }

    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_horizon(mut self, days: usize) -> Self {
        self.horizon = Some(days);
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}
