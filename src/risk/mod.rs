//! Heuristic risk scoring.
//!
//! The scorer walks a fixed, ordered rule table over the extracted facts. Every rule that fires
//! adds its weight to the score and appends its reason, so the reasons always come out in rule
//! order. The final score is clamped to `[MIN_SCORE, MAX_SCORE]` and mapped to a
//! [`RiskLabel`].

mod label;
mod recommendation;

pub use self::{label::RiskLabel, recommendation::Recommendation};

use crate::static_analysis::{AnalysisFacts, Capability};
use serde::Serialize;

/// Lowest possible score.
pub const MIN_SCORE: i32 = 0;
/// Highest possible score.
pub const MAX_SCORE: i32 = 10;

/// Dangerous permission count from which the stronger permission rule fires.
const MANY_DANGEROUS_PERMISSIONS: usize = 3;
/// URL count that has to be exceeded for the URL rule to fire.
const MANY_URLS: usize = 10;

/// Facts the rules are evaluated on.
#[derive(Debug, Clone, Copy)]
pub struct RiskInput<'a> {
    facts: &'a AnalysisFacts,
    debuggable: Option<bool>,
}

/// Contribution of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    weight: i32,
    reason: &'static str,
}

impl Finding {
    fn new(weight: i32, reason: &'static str) -> Self {
        Self { weight, reason }
    }
}

/// A scoring rule. Returns the finding if the rule fires.
pub type Rule = fn(&RiskInput<'_>) -> Option<Finding>;

/// Rules, in evaluation order.
pub const RULES: &[Rule] = &[
    debuggable_rule,
    dangerous_permissions_rule,
    embedded_urls_rule,
    overlay_rule,
    install_packages_rule,
];

fn debuggable_rule(input: &RiskInput<'_>) -> Option<Finding> {
    if input.debuggable == Some(true) {
        Some(Finding::new(
            1,
            "App is debuggable (should be disabled in release builds)",
        ))
    } else {
        None
    }
}

fn dangerous_permissions_rule(input: &RiskInput<'_>) -> Option<Finding> {
    let count = input.facts.dangerous_permissions().len();
    if count >= MANY_DANGEROUS_PERMISSIONS {
        Some(Finding::new(2, "Multiple dangerous permissions declared"))
    } else if count >= 1 {
        Some(Finding::new(1, "Some dangerous permissions declared"))
    } else {
        None
    }
}

fn embedded_urls_rule(input: &RiskInput<'_>) -> Option<Finding> {
    if input.facts.urls().len() > MANY_URLS {
        Some(Finding::new(
            1,
            "Lots of embedded URLs (possible trackers/endpoints)",
        ))
    } else {
        None
    }
}

fn overlay_rule(input: &RiskInput<'_>) -> Option<Finding> {
    if input.facts.has_capability(Capability::DrawOverOtherApps) {
        Some(Finding::new(
            1,
            "Can draw over other apps (SYSTEM_ALERT_WINDOW)",
        ))
    } else {
        None
    }
}

fn install_packages_rule(input: &RiskInput<'_>) -> Option<Finding> {
    if input.facts.has_capability(Capability::RequestInstallPackages) {
        Some(Finding::new(
            1,
            "Can request to install packages (side-loading)",
        ))
    } else {
        None
    }
}

/// Result of the risk scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    #[serde(rename = "risk_score")]
    score: u8,
    #[serde(rename = "risk_label")]
    label: RiskLabel,
    #[serde(rename = "risk_reasons")]
    reasons: Vec<String>,
}

impl RiskAssessment {
    /// Gets the clamped score.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Gets the label derived from the score.
    pub fn label(&self) -> RiskLabel {
        self.label
    }

    /// Gets the reasons, in rule order.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Gets the advice for this assessment's label.
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_label(self.label)
    }
}

/// Assesses the risk of a package from its facts and debuggable flag.
pub fn assess(facts: &AnalysisFacts, debuggable: Option<bool>) -> RiskAssessment {
    assess_with(RULES, &RiskInput { facts, debuggable })
}

/// Runs the given rule table.
fn assess_with(rules: &[Rule], input: &RiskInput<'_>) -> RiskAssessment {
    let mut total = 0_i32;
    let mut reasons = Vec::new();

    for rule in rules {
        if let Some(finding) = rule(input) {
            total = total.saturating_add(finding.weight);
            reasons.push(finding.reason.to_owned());
        }
    }

    let score = clamp_score(total);
    RiskAssessment {
        score,
        label: RiskLabel::from_score(score),
        reasons,
    }
}

/// Clamps an accumulated score into the reportable range.
fn clamp_score(total: i32) -> u8 {
    // Bounded by MAX_SCORE, so the cast cannot truncate.
    total.clamp(MIN_SCORE, MAX_SCORE) as u8
}
