//! Fact extraction from a parsed package.

use super::{
    permission::{is_dangerous, Capability},
    urls,
};
use crate::package::{PackageParser, RawValue, SigningCertificate};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

/// Resolves a failed extraction to a default value.
pub trait BestEffort<T> {
    /// Gets the value, or the default of the field if it could not be retrieved.
    fn best_effort(self, field: &'static str) -> T;
}

impl<T: Default> BestEffort<T> for Result<T> {
    fn best_effort(self, field: &'static str) -> T {
        self.unwrap_or_else(|e| {
            debug!("could not extract `{}`, using the default: {:#}", field, e);
            T::default()
        })
    }
}

/// Identity and flags of the package, passed through as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    package_name: Option<String>,
    app_name: Option<String>,
    version_name: Option<String>,
    version_code: Option<u32>,
    debuggable: Option<bool>,
}

impl PackageInfo {
    /// Extracts the package metadata.
    pub fn extract<P: PackageParser>(package: &P) -> Self {
        Self {
            package_name: package.package_name().map(Some).best_effort("package_name"),
            app_name: package.app_name().map(Some).best_effort("app_name"),
            version_name: package.version_name().map(Some).best_effort("version_name"),
            version_code: package.version_code().map(Some).best_effort("version_code"),
            debuggable: package.is_debuggable().map(Some).best_effort("debuggable"),
        }
    }

    /// Gets the package name.
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// Gets the application label.
    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    /// Gets the version name.
    pub fn version_name(&self) -> Option<&str> {
        self.version_name.as_deref()
    }

    /// Gets the version code.
    pub fn version_code(&self) -> Option<u32> {
        self.version_code
    }

    /// Gets the debuggable flag, if known.
    pub fn debuggable(&self) -> Option<bool> {
        self.debuggable
    }
}

/// Summary of a signing certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CertificateSummary {
    /// Certificate whose fields could be read.
    Structured {
        /// Issuer distinguished name.
        issuer: Option<String>,
        /// Subject distinguished name.
        subject: Option<String>,
        /// Serial number.
        serial_number: Option<String>,
    },
    /// Certificate that could not be decomposed, in its string form.
    Opaque(String),
}

impl CertificateSummary {
    /// Summarizes the given certificate.
    pub fn from_certificate<C: SigningCertificate>(certificate: &C) -> Self {
        let fields = || -> Result<Self> {
            Ok(Self::Structured {
                issuer: certificate.issuer()?,
                subject: certificate.subject()?,
                serial_number: certificate.serial_number()?,
            })
        };

        fields().unwrap_or_else(|e| {
            debug!("could not decompose a certificate: {:#}", e);
            Self::Opaque(certificate.to_string())
        })
    }
}

/// Facts the risk assessment works on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisFacts {
    permissions: Vec<String>,
    dangerous_permissions: Vec<String>,
    receivers: Vec<RawValue>,
    services: Vec<RawValue>,
    activities: Vec<RawValue>,
    urls: Vec<String>,
    certificates: Vec<CertificateSummary>,
}

impl AnalysisFacts {
    /// Extracts the facts of the package. Every fact is retrieved on its own, and a fact that
    /// cannot be retrieved is left empty.
    pub fn extract<P: PackageParser>(package: &P) -> Self {
        let permissions = normalize_permissions(package.permissions().best_effort("permissions"));
        let dangerous_permissions = dangerous_permissions(&permissions);

        let manifest = package.manifest_text().map(Some).best_effort("manifest_text");
        let files = package.internal_files().best_effort("internal_files");
        let urls = urls::harvest(manifest.as_deref(), &files);

        let certificates = package
            .certificates()
            .map(|chain| {
                chain
                    .iter()
                    .map(CertificateSummary::from_certificate)
                    .collect::<Vec<_>>()
            })
            .best_effort("certificates");

        Self {
            permissions,
            dangerous_permissions,
            receivers: package.receivers().best_effort("receivers"),
            services: package.services().best_effort("services"),
            activities: package.activities().best_effort("activities"),
            urls,
            certificates,
        }
    }

    /// Gets the requested permissions, sorted and without duplicates.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Gets the dangerous subset of the permissions.
    pub fn dangerous_permissions(&self) -> &[String] {
        &self.dangerous_permissions
    }

    /// Gets the declared broadcast receivers.
    pub fn receivers(&self) -> &[RawValue] {
        &self.receivers
    }

    /// Gets the declared services.
    pub fn services(&self) -> &[RawValue] {
        &self.services
    }

    /// Gets the declared activities.
    pub fn activities(&self) -> &[RawValue] {
        &self.activities
    }

    /// Gets the embedded URLs, sorted and without duplicates.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Gets the signing certificates.
    pub fn certificates(&self) -> &[CertificateSummary] {
        &self.certificates
    }

    /// Checks if any dangerous permission grants the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.dangerous_permissions
            .iter()
            .any(|p| p.contains(capability.marker()))
    }
}

/// Deduplicates and sorts the permissions.
fn normalize_permissions(permissions: Vec<String>) -> Vec<String> {
    permissions
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Selects the dangerous permissions, keeping the order.
fn dangerous_permissions(permissions: &[String]) -> Vec<String> {
    permissions
        .iter()
        .filter(|p| is_dangerous(p))
        .cloned()
        .collect()
}

#[cfg(test)]
impl AnalysisFacts {
    /// Builds facts directly, normalizing the permissions the same way the extraction does.
    pub(crate) fn from_parts(permissions: Vec<String>, urls: Vec<String>) -> Self {
        let permissions = normalize_permissions(permissions);
        let dangerous_permissions = dangerous_permissions(&permissions);
        let urls = urls.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        Self {
            permissions,
            dangerous_permissions,
            urls,
            ..Self::default()
        }
    }
}
