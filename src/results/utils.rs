use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs::File, io, path::Path};

/// Content fingerprint of a submitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerPrint {
    sha256: [u8; 32],
}

impl FingerPrint {
    /// Creates a new fingerprint, streaming the file through the hasher.
    pub fn new<P: AsRef<Path>>(package: P) -> Result<Self> {
        let mut f = File::open(package.as_ref())
            .with_context(|| format!("could not open {}", package.as_ref().display()))?;

        let mut sha256 = Sha256::new();
        let _ = io::copy(&mut f, &mut sha256)?;

        let mut fingerprint = Self { sha256: [0; 32] };
        fingerprint.sha256.copy_from_slice(&sha256.finalize());

        Ok(fingerprint)
    }

    /// Gets the hexadecimal SHA-256 digest.
    pub fn sha256(&self) -> String {
        hex::encode(self.sha256)
    }
}
