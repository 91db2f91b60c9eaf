//! Advice shown to the analyst for each risk label.

use super::RiskLabel;

/// Fixed advisory message pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    recommendation: &'static str,
    reason: &'static str,
}

impl Recommendation {
    /// Gets the recommendation for the given label.
    pub fn for_label(label: RiskLabel) -> Self {
        match label {
            RiskLabel::Low => Self {
                recommendation: "Generally safe (Low risk).",
                reason: "No significant risk factors detected. Verify the source.",
            },
            RiskLabel::Medium => Self {
                recommendation: "Recommended installation (Medium risk).",
                reason: "Multiple risk factors detected. Verify the source and review \
                         permissions before installation.",
            },
            RiskLabel::High => Self {
                recommendation: "Install caution is advised (High risk).",
                reason: "Dangerous permissions or behavior detected. Avoid installing from \
                         untrusted sources.",
            },
        }
    }

    /// Gets the short recommendation.
    pub fn recommendation(&self) -> &'static str {
        self.recommendation
    }

    /// Gets the explanation of the recommendation.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}
