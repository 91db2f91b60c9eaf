//! Static analysis of a parsed package.
//!
//! The facts of the package are extracted first and then used to assess its risk.

mod facts;
mod permission;
mod urls;

pub use self::{
    facts::{AnalysisFacts, BestEffort, CertificateSummary, PackageInfo},
    permission::{is_dangerous, Capability, DangerousPermission},
    urls::harvest as harvest_urls,
};

use crate::{
    package::PackageParser,
    risk::{self, RiskAssessment},
};
use log::debug;

/// Everything the static analysis learns about a package.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAnalysis {
    info: PackageInfo,
    facts: AnalysisFacts,
    risk: RiskAssessment,
}

impl StaticAnalysis {
    /// Gets the package metadata.
    pub fn info(&self) -> &PackageInfo {
        &self.info
    }

    /// Gets the extracted facts.
    pub fn facts(&self) -> &AnalysisFacts {
        &self.facts
    }

    /// Gets the risk assessment.
    pub fn risk(&self) -> &RiskAssessment {
        &self.risk
    }
}

/// Runs the static analysis on the given package. It never fails: facts that cannot be
/// retrieved are left empty.
pub fn static_analysis<P: PackageParser>(package: &P) -> StaticAnalysis {
    let info = PackageInfo::extract(package);
    let facts = AnalysisFacts::extract(package);
    debug!(
        "extracted {} permissions ({} dangerous), {} URLs and {} certificates",
        facts.permissions().len(),
        facts.dangerous_permissions().len(),
        facts.urls().len(),
        facts.certificates().len()
    );

    let risk = risk::assess(&facts, info.debuggable());
    StaticAnalysis { info, facts, risk }
}
