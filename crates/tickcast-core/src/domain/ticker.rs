use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Equities the forecaster is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ticker {
    Goog,
    Msft,
}

impl Ticker {
    pub const ALL: [Self; 2] = [Self::Goog, Self::Msft];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goog => "GOOG",
            Self::Msft => "MSFT",
        }
    }

    pub const fn company_name(self) -> &'static str {
        match self {
            Self::Goog => "Google",
            Self::Msft => "Microsoft",
        }
    }

    /// Label in the `Company (TICKER)` form used by selection widgets.
    pub fn display_label(self) -> String {
        format!("{} ({})", self.company_name(), self.as_str())
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = ValidationError;

    /// Accepts the bare symbol in any case, or a `Company (TICKER)` label.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let symbol = match (trimmed.rfind('('), trimmed.strip_suffix(')')) {
            (Some(open), Some(inner)) => &inner[open + 1..],
            _ => trimmed,
        };

        match symbol.trim().to_ascii_uppercase().as_str() {
            "GOOG" => Ok(Self::Goog),
            "MSFT" => Ok(Self::Msft),
            _ => Err(ValidationError::UnknownTicker {
                value: value.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.as_str().to_owned()
    }
}
