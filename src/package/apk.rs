//! Package parser backed by the APK file itself.

use super::{
    certificate::{self, Certificate},
    manifest::Manifest,
    PackageParser, RawValue,
};
use crate::{error::ErrorKind, utils::get_string};
use anyhow::{anyhow, Context, Result};
use log::debug;
use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};
use tempfile::TempDir;
use zip::ZipArchive;

/// Name of the manifest entry inside the package.
const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// Android package opened from disk.
///
/// Binary resources are decoded with `abxml` into a temporary folder that lives as long as the
/// package.
///
/// Signature blocks are only read when the certificates are requested, so a damaged block
/// cannot prevent the rest of the package from being analyzed.
#[derive(Debug)]
pub struct Apk {
    path: PathBuf,
    manifest: Manifest,
    files: Vec<String>,
    signature_blocks: Vec<String>,
    decoded: TempDir,
}

impl Apk {
    /// Opens and decodes the package at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let zip = open_archive(path)?;

        let files: Vec<String> = zip.file_names().map(str::to_owned).collect();
        if !files.iter().any(|f| f == MANIFEST_ENTRY) {
            return Err(ErrorKind::MissingManifest.into());
        }
        let signature_blocks = files
            .iter()
            .filter(|f| certificate::is_signature_block(f))
            .cloned()
            .collect();

        let decoded = tempfile::tempdir().context("could not create the decoding folder")?;
        debug!(
            "decoding the binary resources of {} into {}",
            path.display(),
            decoded.path().display()
        );
        let mut apk = abxml::apk::Apk::from_path(path).map_err(|e| anyhow!("{}", e))?;
        apk.export(decoded.path(), true)
            .map_err(|e| anyhow!("{}", e))?;

        let manifest = Manifest::parse(
            fs::read_to_string(decoded.path().join(MANIFEST_ENTRY))
                .context("the decoded manifest could not be read")?,
        )?;

        Ok(Self {
            path: path.to_owned(),
            manifest,
            files,
            signature_blocks,
            decoded,
        })
    }
}

/// Opens the package as a ZIP archive.
fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    ZipArchive::new(
        File::open(path).with_context(|| format!("could not open {}", path.display()))?,
    )
    .context("invalid Zip archive")
}

/// Reads a whole entry of the archive.
///
/// The buffer grows with the data actually read, never with the size the header claims.
fn read_entry(zip: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>> {
    let mut entry = zip
        .by_name(name)
        .with_context(|| format!("could not find {} in the package", name))?;
    let mut contents = Vec::new();
    let _ = entry
        .read_to_end(&mut contents)
        .with_context(|| format!("could not read {} from the package", name))?;
    Ok(contents)
}

impl PackageParser for Apk {
    type Certificate = Certificate;

    fn package_name(&self) -> Result<String> {
        self.manifest.package().map(str::to_owned)
    }

    fn app_name(&self) -> Result<String> {
        let label = self
            .manifest
            .label()
            .context("the application does not declare a label")?;
        match label.strip_prefix("@string/") {
            Some(name) => get_string(name, self.decoded.path())?
                .with_context(|| format!("the string resource `{}` was not found", name)),
            None => Ok(label.to_owned()),
        }
    }

    fn version_name(&self) -> Result<String> {
        self.manifest.version_name().map(str::to_owned)
    }

    fn version_code(&self) -> Result<u32> {
        self.manifest.version_code()
    }

    fn is_debuggable(&self) -> Result<bool> {
        self.manifest.is_debuggable()
    }

    fn permissions(&self) -> Result<Vec<String>> {
        Ok(self.manifest.permissions().to_vec())
    }

    fn receivers(&self) -> Result<Vec<RawValue>> {
        Ok(self
            .manifest
            .receivers()?
            .into_iter()
            .map(RawValue::from)
            .collect())
    }

    fn services(&self) -> Result<Vec<RawValue>> {
        Ok(self
            .manifest
            .services()?
            .into_iter()
            .map(RawValue::from)
            .collect())
    }

    fn activities(&self) -> Result<Vec<RawValue>> {
        Ok(self
            .manifest
            .activities()?
            .into_iter()
            .map(RawValue::from)
            .collect())
    }

    fn manifest_text(&self) -> Result<String> {
        Ok(self.manifest.code().to_owned())
    }

    fn internal_files(&self) -> Result<Vec<RawValue>> {
        Ok(self.files.iter().map(|f| RawValue::from(f.as_str())).collect())
    }

    fn certificates(&self) -> Result<Vec<Certificate>> {
        let scratch = self.decoded.path().join("signatures");
        fs::create_dir_all(&scratch)?;

        let mut zip = open_archive(&self.path)?;
        let mut certificates = Vec::new();
        for name in &self.signature_blocks {
            let block = read_entry(&mut zip, name)?;
            certificates.extend(certificate::decode_signature_block(name, &block, &scratch)?);
        }
        Ok(certificates)
    }
}

#[cfg(test)]
mod tests {
    use super::{open_archive, read_entry, Apk};
    use crate::{
        error::ErrorKind,
        package::{manifest::Manifest, PackageParser},
        static_analysis::static_analysis,
    };
    use std::{fs, io::Write, path::Path};
    use zip::{write::FileOptions, CompressionMethod, ZipWriter};

    const MANIFEST: &str = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android"
        package="com.example.flashlight" android:versionCode="3" android:versionName="1.2">
        <uses-permission android:name="android.permission.CAMERA"/>
        <application android:label="Flashlight"/>
    </manifest>"#;
    const BLOCK: &[u8] = b"signature block payload";

    /// Writes an uncompressed package, so that entry contents can be patched in place.
    fn write_package(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
        for (name, contents) in entries {
            zip.start_file(
                *name,
                FileOptions::default().compression_method(CompressionMethod::Stored),
            )
            .unwrap();
            zip.write_all(contents).unwrap();
        }
        let _ = zip.finish().unwrap();
    }

    fn position(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap()
    }

    #[test]
    fn it_rejects_non_zip_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.apk");
        fs::write(&path, b"this is not a zip archive").unwrap();

        let error = Apk::open(&path).unwrap_err();
        assert_eq!(error.to_string(), "invalid Zip archive");
    }

    #[test]
    fn it_requires_a_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.apk");
        write_package(&path, &[("classes.dex", b"dex\n035\0")]);

        let error = Apk::open(&path).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::MissingManifest)
        ));
    }

    #[test]
    fn it_damaged_signature_block_only_clears_certificates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("damaged.apk");
        write_package(
            &path,
            &[
                ("AndroidManifest.xml", MANIFEST.as_bytes()),
                ("META-INF/CERT.RSA", BLOCK),
            ],
        );
        let mut bytes = fs::read(&path).unwrap();
        let at = position(&bytes, BLOCK);
        bytes[at] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let apk = Apk {
            path: path.clone(),
            manifest: Manifest::parse(MANIFEST).unwrap(),
            files: vec![
                "AndroidManifest.xml".to_owned(),
                "META-INF/CERT.RSA".to_owned(),
            ],
            signature_blocks: vec!["META-INF/CERT.RSA".to_owned()],
            decoded: tempfile::tempdir().unwrap(),
        };
        assert!(apk.certificates().is_err());

        let analysis = static_analysis(&apk);
        assert!(analysis.facts().certificates().is_empty());
        assert_eq!(
            analysis.info().package_name(),
            Some("com.example.flashlight")
        );
        assert_eq!(analysis.info().app_name(), Some("Flashlight"));
        assert_eq!(analysis.info().version_code(), Some(3));
        assert_eq!(
            analysis.facts().permissions(),
            &["android.permission.CAMERA".to_owned()]
        );
    }

    #[test]
    fn it_read_entry_ignores_declared_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oversized.apk");
        write_package(&path, &[("META-INF/CERT.RSA", BLOCK)]);

        // Claim an uncompressed size of almost 4 GiB in the central directory.
        let mut bytes = fs::read(&path).unwrap();
        let central = position(&bytes, b"PK\x01\x02");
        bytes[central + 24..central + 28].copy_from_slice(&0xffff_fff0_u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();

        let mut zip = open_archive(&path).unwrap();
        assert_eq!(read_entry(&mut zip, "META-INF/CERT.RSA").unwrap(), BLOCK);
        assert!(read_entry(&mut zip, "META-INF/MISSING.RSA").is_err());
    }
}
