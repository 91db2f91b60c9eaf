//! Module containing the definition of error types.

use thiserror::Error;

/// Enumeration of the different error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Configuration error.
    #[error("there was an error in the configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },
    /// The package does not contain an `AndroidManifest.xml` file.
    #[error("the package does not contain an AndroidManifest.xml file")]
    MissingManifest,
    /// A signature block could not be decoded.
    #[error("could not decode the signature block {file}: {message}")]
    Certificate {
        /// Signature block file inside the package.
        file: String,
        /// Error message.
        message: String,
    },
    /// The package is bigger than the configured limit.
    #[error("File too large. Max allowed is {max_mb} MB.")]
    PackageTooLarge {
        /// Maximum size, in mebibytes.
        max_mb: u64,
    },
    /// The package does not have one of the accepted extensions.
    #[error("Only {allowed} files are allowed")]
    UnsupportedExtension {
        /// Accepted extensions, formatted for display (`.apk`).
        allowed: String,
    },
}
