//! Risk label module.

use serde::{Serialize, Serializer};
use std::fmt;

/// Highest score that is still considered low risk.
const LOW_MAX_SCORE: u8 = 2;
/// Highest score that is still considered medium risk.
const MEDIUM_MAX_SCORE: u8 = 5;

/// Three-tier risk label.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum RiskLabel {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl RiskLabel {
    /// Gets the label for the given (already clamped) score.
    pub fn from_score(score: u8) -> Self {
        if score <= LOW_MAX_SCORE {
            Self::Low
        } else if score <= MEDIUM_MAX_SCORE {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Gets the label as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RiskLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
