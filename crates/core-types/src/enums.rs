use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The performance band a student falls into, derived solely from their average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl Tier {
    /// Lowest average that still counts as `Excellent`.
    pub const EXCELLENT_FROM: f64 = 90.0;
    /// Lowest average that still counts as `Good`.
    pub const GOOD_FROM: f64 = 75.0;

    /// Classifies an average. Each band includes its lower bound.
    pub fn from_average(average: f64) -> Self {
        if average >= Self::EXCELLENT_FROM {
            Tier::Excellent
        } else if average >= Self::GOOD_FROM {
            Tier::Good
        } else {
            Tier::NeedsImprovement
        }
    }

    /// The text stored in the `remarks` column.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Excellent" => Ok(Tier::Excellent),
            "Good" => Ok(Tier::Good),
            "Needs Improvement" => Ok(Tier::NeedsImprovement),
            other => Err(CoreError::UnknownTier(other.to_string())),
        }
    }
}
