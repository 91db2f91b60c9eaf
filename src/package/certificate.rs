//! Signing certificate decoding.
//!
//! Signature blocks (`META-INF/*.RSA`, `*.DSA`, `*.EC`) are PKCS#7 containers. They are
//! decoded with the `openssl` command line tool, and the issuer, subject and serial number of
//! every certificate are read from its text output.

use super::SigningCertificate;
use crate::error::ErrorKind;
use anyhow::{Context, Result};
use log::debug;
use std::{fmt, fs, path::Path, process::Command};

/// Extensions of the signature block files.
const SIGNATURE_EXTENSIONS: [&str; 3] = ["RSA", "DSA", "EC"];

/// Checks if the given entry of the package is a signature block.
pub fn is_signature_block(entry: &str) -> bool {
    entry.starts_with("META-INF/")
        && Path::new(entry)
            .extension()
            .map_or(false, |ext| {
                SIGNATURE_EXTENSIONS
                    .iter()
                    .any(|s| ext.to_string_lossy().eq_ignore_ascii_case(s))
            })
}

/// Certificate as printed by `openssl`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Certificate {
    issuer: Option<String>,
    subject: Option<String>,
    serial_number: Option<String>,
    text: String,
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.trim())
    }
}

impl SigningCertificate for Certificate {
    fn issuer(&self) -> Result<Option<String>> {
        Ok(self.issuer.clone())
    }

    fn subject(&self) -> Result<Option<String>> {
        Ok(self.subject.clone())
    }

    fn serial_number(&self) -> Result<Option<String>> {
        Ok(self.serial_number.clone())
    }
}

/// Decodes the signature block with the given name and contents.
///
/// The block is written to `scratch` so that `openssl` can read it.
pub fn decode_signature_block<P: AsRef<Path>>(
    name: &str,
    block: &[u8],
    scratch: P,
) -> Result<Vec<Certificate>> {
    let file_name = Path::new(name)
        .file_name()
        .map_or_else(|| "signature".into(), |n| n.to_string_lossy().into_owned());
    let path = scratch.as_ref().join(file_name);
    fs::write(&path, block)
        .with_context(|| format!("could not write the signature block {}", name))?;

    debug!("decoding the signature block {} with openssl", name);
    let output = Command::new("openssl")
        .arg("pkcs7")
        .arg("-inform")
        .arg("DER")
        .arg("-in")
        .arg(&path)
        .arg("-noout")
        .arg("-print_certs")
        .arg("-text")
        .output()
        .context("there was an error when executing the openssl command")?;

    if !output.status.success() {
        return Err(ErrorKind::Certificate {
            file: name.to_owned(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        }
        .into());
    }

    Ok(parse_certificates(&String::from_utf8_lossy(&output.stdout)))
}

/// Parses the text output of `openssl pkcs7 -print_certs -text`.
pub fn parse_certificates(output: &str) -> Vec<Certificate> {
    let mut certificates = Vec::new();
    let mut current: Option<Certificate> = None;
    let mut serial_on_next_line = false;

    for line in output.lines() {
        let trimmed = line.trim();

        if trimmed == "Certificate:" {
            certificates.extend(current.take());
            current = Some(Certificate::default());
            serial_on_next_line = false;
        }
        let certificate = match current.as_mut() {
            Some(c) => c,
            None => continue,
        };
        certificate.text.push_str(line);
        certificate.text.push('\n');

        if serial_on_next_line {
            certificate.serial_number = Some(trimmed.to_owned());
            serial_on_next_line = false;
        } else if let Some(serial) = trimmed.strip_prefix("Serial Number:") {
            let serial = serial.trim();
            if serial.is_empty() {
                serial_on_next_line = true;
            } else {
                certificate.serial_number = Some(serial.to_owned());
            }
        } else if let Some(issuer) = trimmed.strip_prefix("Issuer:") {
            certificate.issuer = Some(issuer.trim().to_owned());
        } else if let Some(subject) = trimmed.strip_prefix("Subject:") {
            certificate.subject = Some(subject.trim().to_owned());
        }
    }
    certificates.extend(current);

    certificates
}
