//! Analysis results and their serialization.

mod report;
mod utils;

pub use self::{
    report::{Generator, Json},
    utils::FingerPrint,
};

use crate::{static_analysis::StaticAnalysis, Config};
use log::warn;
use serde::{
    ser::{SerializeStruct, Serializer},
    Serialize,
};
use std::path::Path;

/// Outcome of the analysis of one package.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    /// The package could be parsed.
    Success(Box<StaticAnalysis>),
    /// The package could not be analyzed at all.
    Failure {
        /// Error message shown to the analyst.
        error: String,
    },
}

impl AnalysisResult {
    /// Creates a failed result with the given message.
    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// Checks if the analysis succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Gets the analysis, if it succeeded.
    pub fn analysis(&self) -> Option<&StaticAnalysis> {
        match self {
            Self::Success(analysis) => Some(analysis),
            Self::Failure { .. } => None,
        }
    }

    /// Gets the error message, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl From<StaticAnalysis> for AnalysisResult {
    fn from(analysis: StaticAnalysis) -> Self {
        Self::Success(Box::new(analysis))
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Failure { error } => {
                let mut ser_struct = serializer.serialize_struct("AnalysisResult", 2)?;
                ser_struct.serialize_field("ok", &false)?;
                ser_struct.serialize_field("error", error)?;
                ser_struct.end()
            }
            Self::Success(analysis) => {
                let info = analysis.info();
                let facts = analysis.facts();
                let risk = analysis.risk();
                let recommendation = risk.recommendation();

                let mut ser_struct = serializer.serialize_struct("AnalysisResult", 18)?;
                ser_struct.serialize_field("ok", &true)?;

                ser_struct.serialize_field("package_name", &info.package_name())?;
                ser_struct.serialize_field("app_name", &info.app_name())?;
                ser_struct.serialize_field("version_name", &info.version_name())?;
                ser_struct.serialize_field("version_code", &info.version_code())?;
                ser_struct.serialize_field("debuggable", &info.debuggable())?;

                ser_struct.serialize_field("permissions", facts.permissions())?;
                ser_struct
                    .serialize_field("dangerous_permissions", facts.dangerous_permissions())?;
                ser_struct.serialize_field("receivers", facts.receivers())?;
                ser_struct.serialize_field("services", facts.services())?;
                ser_struct.serialize_field("activities", facts.activities())?;
                ser_struct.serialize_field("urls", facts.urls())?;
                ser_struct.serialize_field("certificates", facts.certificates())?;

                ser_struct.serialize_field("risk_score", &risk.score())?;
                ser_struct.serialize_field("risk_label", &risk.label())?;
                ser_struct.serialize_field("risk_reasons", risk.reasons())?;

                ser_struct.serialize_field("recommendation", recommendation.recommendation())?;
                ser_struct
                    .serialize_field("recommendation_reason", recommendation.reason())?;

                ser_struct.end()
            }
        }
    }
}

/// Analysis result of a submitted file, with the metadata of the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    result: AnalysisResult,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

impl Submission {
    /// Wraps the result of the analysis of the given file. The file is fingerprinted if it
    /// can be read.
    pub fn new<P: AsRef<Path>>(package: P, result: AnalysisResult) -> Self {
        let package = package.as_ref();
        let sha256 = match FingerPrint::new(package) {
            Ok(fingerprint) => Some(fingerprint.sha256()),
            Err(e) => {
                warn!(
                    "could not fingerprint {}: {:#}",
                    package.display(),
                    e
                );
                None
            }
        };

        Self {
            result,
            filename: crate::get_package_name(package),
            sha256,
        }
    }

    /// Wraps the rejection of the given file. Rejected files are not read, so no digest is
    /// computed.
    pub fn rejected<P: AsRef<Path>>(package: P, result: AnalysisResult) -> Self {
        Self {
            result,
            filename: crate::get_package_name(package),
            sha256: None,
        }
    }

    /// Gets the analysis result.
    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    /// Gets the submitted file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Gets the SHA-256 of the submitted file, if it could be computed.
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    /// Writes the configured reports for this submission.
    pub fn generate_report(&self, config: &Config) -> anyhow::Result<()> {
        let mut json_reporter = Json::new();
        json_reporter.generate(config, self)
    }
}

#[cfg(test)]
mod tests;
