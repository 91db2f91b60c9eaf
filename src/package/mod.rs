//! Access to the contents of an Android package.
//!
//! The analysis never touches the ZIP container or the binary XML directly. It goes through
//! the [`PackageParser`] trait, whose accessors may all fail independently of each other. The
//! [`Apk`] type implements it on top of `zip` and `abxml`.

#[cfg(feature = "apk")]
mod apk;
#[cfg(feature = "apk")]
pub mod certificate;
#[cfg(test)]
pub(crate) mod fake;
#[cfg(feature = "apk")]
pub mod manifest;
mod value;

#[cfg(feature = "apk")]
pub use self::apk::Apk;
pub use self::value::RawValue;

use anyhow::Result;
use std::fmt::Display;

/// A signing certificate as exposed by a package parser.
///
/// Any accessor may fail, in which case the analysis falls back to the certificate's string
/// form.
pub trait SigningCertificate: Display {
    /// Gets the issuer distinguished name.
    fn issuer(&self) -> Result<Option<String>>;
    /// Gets the subject distinguished name.
    fn subject(&self) -> Result<Option<String>>;
    /// Gets the serial number.
    fn serial_number(&self) -> Result<Option<String>>;
}

/// Parsed Android package.
pub trait PackageParser {
    /// Certificate type of this parser.
    type Certificate: SigningCertificate;

    /// Gets the package name declared in the manifest.
    fn package_name(&self) -> Result<String>;
    /// Gets the application label, with string resources resolved.
    fn app_name(&self) -> Result<String>;
    /// Gets the human readable version.
    fn version_name(&self) -> Result<String>;
    /// Gets the internal version number.
    fn version_code(&self) -> Result<u32>;
    /// Checks whether the application is flagged as debuggable.
    fn is_debuggable(&self) -> Result<bool>;
    /// Gets the requested permissions. They may contain duplicates.
    fn permissions(&self) -> Result<Vec<String>>;
    /// Gets the declared broadcast receivers.
    fn receivers(&self) -> Result<Vec<RawValue>>;
    /// Gets the declared services.
    fn services(&self) -> Result<Vec<RawValue>>;
    /// Gets the declared activities.
    fn activities(&self) -> Result<Vec<RawValue>>;
    /// Gets the textual manifest.
    fn manifest_text(&self) -> Result<String>;
    /// Gets the listing of the files inside the package.
    fn internal_files(&self) -> Result<Vec<RawValue>>;
    /// Gets the signing certificate chain.
    fn certificates(&self) -> Result<Vec<Self::Certificate>>;
}
