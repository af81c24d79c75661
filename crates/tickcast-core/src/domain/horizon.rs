use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Number of business days to project, always within `1..=Horizon::MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Horizon(usize);

impl Horizon {
    pub const MIN_DAYS: usize = 1;
    pub const MAX_DAYS: usize = 90;

    pub fn new(days: usize) -> Result<Self, ValidationError> {
        if !(Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            return Err(ValidationError::HorizonOutOfRange {
                value: days,
                min: Self::MIN_DAYS,
                max: Self::MAX_DAYS,
            });
        }
        Ok(Self(days))
    }

    pub const fn days(self) -> usize {
        self.0
    }
}

impl Display for Horizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for Horizon {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Horizon> for usize {
    fn from(value: Horizon) -> Self {
        value.0
    }
}

/// Range of horizons a caller may request, e.g. the bounds of a UI slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for HorizonBounds {
    fn default() -> Self {
        Self { min: 7, max: 90 }
    }
}

impl HorizonBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, ValidationError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min < Horizon::MIN_DAYS || self.max > Horizon::MAX_DAYS || self.min > self.max {
            return Err(ValidationError::InvalidHorizonBounds {
                min: self.min,
                max: self.max,
                limit: Horizon::MAX_DAYS,
            });
        }
        Ok(())
    }

    /// Build a horizon that also honours these request bounds.
    pub fn horizon(&self, days: usize) -> Result<Horizon, ValidationError> {
        if !(self.min..=self.max).contains(&days) {
            return Err(ValidationError::HorizonOutOfRange {
                value: days,
                min: self.min,
                max: self.max,
            });
        }
        Horizon::new(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_engine_range() {
        assert_eq!(Horizon::new(1).expect("valid").days(), 1);
        assert_eq!(Horizon::new(90).expect("valid").days(), 90);
        assert!(matches!(
            Horizon::new(0),
            Err(ValidationError::HorizonOutOfRange { .. })
        ));
        assert!(matches!(
            Horizon::new(91),
            Err(ValidationError::HorizonOutOfRange { .. })
        ));
    }

    #[test]
    fn request_bounds_are_narrower_than_engine_range() {
        let bounds = HorizonBounds::default();
        assert!(bounds.horizon(7).is_ok());
        let err = bounds.horizon(3).expect_err("below slider minimum");
        assert_eq!(
            err,
            ValidationError::HorizonOutOfRange {
                value: 3,
                min: 7,
                max: 90
            }
        );
    }

    #[test]
    fn rejects_bounds_outside_engine_range() {
        assert!(HorizonBounds::new(0, 10).is_err());
        assert!(HorizonBounds::new(5, 120).is_err());
        assert!(HorizonBounds::new(20, 10).is_err());
    }
}
