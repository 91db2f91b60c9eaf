//! In-memory package parser for tests.

use super::{PackageParser, RawValue, SigningCertificate};
use anyhow::{anyhow, Result};
use std::fmt;

type Field<T> = std::result::Result<T, String>;

fn field<T: Clone>(value: &Field<T>) -> Result<T> {
    value.clone().map_err(|e| anyhow!(e))
}

/// Certificate with configurable accessors.
#[derive(Debug, Clone)]
pub struct FakeCertificate {
    pub issuer: Field<Option<String>>,
    pub subject: Field<Option<String>>,
    pub serial_number: Field<Option<String>>,
    pub display: String,
}

impl FakeCertificate {
    pub fn new(issuer: &str, subject: &str, serial_number: &str) -> Self {
        Self {
            issuer: Ok(Some(issuer.to_owned())),
            subject: Ok(Some(subject.to_owned())),
            serial_number: Ok(Some(serial_number.to_owned())),
            display: format!("<certificate {}>", serial_number),
        }
    }
}

impl fmt::Display for FakeCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl SigningCertificate for FakeCertificate {
    fn issuer(&self) -> Result<Option<String>> {
        field(&self.issuer)
    }

    fn subject(&self) -> Result<Option<String>> {
        field(&self.subject)
    }

    fn serial_number(&self) -> Result<Option<String>> {
        field(&self.serial_number)
    }
}

/// Package whose every accessor can be set to a value or to a failure.
#[derive(Debug, Clone)]
pub struct FakePackage {
    pub package_name: Field<String>,
    pub app_name: Field<String>,
    pub version_name: Field<String>,
    pub version_code: Field<u32>,
    pub debuggable: Field<bool>,
    pub permissions: Field<Vec<String>>,
    pub receivers: Field<Vec<RawValue>>,
    pub services: Field<Vec<RawValue>>,
    pub activities: Field<Vec<RawValue>>,
    pub manifest_text: Field<String>,
    pub internal_files: Field<Vec<RawValue>>,
    pub certificates: Field<Vec<FakeCertificate>>,
}

impl Default for FakePackage {
    fn default() -> Self {
        Self {
            package_name: Ok("com.example.app".to_owned()),
            app_name: Ok("Example".to_owned()),
            version_name: Ok("1.0".to_owned()),
            version_code: Ok(1),
            debuggable: Ok(false),
            permissions: Ok(Vec::new()),
            receivers: Ok(Vec::new()),
            services: Ok(Vec::new()),
            activities: Ok(Vec::new()),
            manifest_text: Ok("<manifest package=\"com.example.app\"/>".to_owned()),
            internal_files: Ok(Vec::new()),
            certificates: Ok(Vec::new()),
        }
    }
}

impl FakePackage {
    /// Sets the declared permissions.
    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = Ok(permissions.iter().map(|p| (*p).to_owned()).collect());
        self
    }

    /// Adds `count` distinct URLs to the file listing.
    pub fn with_urls(mut self, count: usize) -> Self {
        self.internal_files = Ok((0..count)
            .map(|i| RawValue::Text(format!("assets/https://host{}.example.com/", i)))
            .collect());
        self
    }

    /// Sets the debuggable flag.
    pub fn debuggable(mut self, debuggable: bool) -> Self {
        self.debuggable = Ok(debuggable);
        self
    }
}

impl PackageParser for FakePackage {
    type Certificate = FakeCertificate;

    fn package_name(&self) -> Result<String> {
        field(&self.package_name)
    }

    fn app_name(&self) -> Result<String> {
        field(&self.app_name)
    }

    fn version_name(&self) -> Result<String> {
        field(&self.version_name)
    }

    fn version_code(&self) -> Result<u32> {
        field(&self.version_code)
    }

    fn is_debuggable(&self) -> Result<bool> {
        field(&self.debuggable)
    }

    fn permissions(&self) -> Result<Vec<String>> {
        field(&self.permissions)
    }

    fn receivers(&self) -> Result<Vec<RawValue>> {
        field(&self.receivers)
    }

    fn services(&self) -> Result<Vec<RawValue>> {
        field(&self.services)
    }

    fn activities(&self) -> Result<Vec<RawValue>> {
        field(&self.activities)
    }

    fn manifest_text(&self) -> Result<String> {
        field(&self.manifest_text)
    }

    fn internal_files(&self) -> Result<Vec<RawValue>> {
        field(&self.internal_files)
    }

    fn certificates(&self) -> Result<Vec<FakeCertificate>> {
        field(&self.certificates)
    }
}
