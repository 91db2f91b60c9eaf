//! Module containing the manifest parsing logic.

use crate::utils::parser_config;
use anyhow::{bail, Context, Result};
use xml::{
    attribute::OwnedAttribute,
    reader::{EventReader, XmlEvent},
};

/// Facts read from a textual `AndroidManifest.xml`.
///
/// Values are kept as written, so a malformed value only fails the accessor reading it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    code: String,
    package: Option<String>,
    version_name: Option<String>,
    version_code: Option<String>,
    debuggable: Option<String>,
    label: Option<String>,
    permissions: Vec<String>,
    activities: Vec<String>,
    services: Vec<String>,
    receivers: Vec<String>,
}

impl Manifest {
    /// Parses the given manifest document.
    pub fn parse<S: Into<String>>(code: S) -> Result<Self> {
        let mut manifest = Self {
            code: code.into(),
            ..Self::default()
        };

        let parser = EventReader::new_with_config(manifest.code.as_bytes(), parser_config());
        let mut elements = Vec::new();
        for e in parser {
            match e.context("the manifest is not a well-formed XML document")? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => elements.push((name.local_name, attributes)),
                XmlEvent::EndDocument => break,
                _ => {}
            }
        }

        let mut found_root = false;
        for (tag, attributes) in elements {
            match tag.as_str() {
                "manifest" => {
                    found_root = true;
                    manifest.package = attribute(&attributes, "package");
                    manifest.version_name = attribute(&attributes, "versionName");
                    manifest.version_code = attribute(&attributes, "versionCode");
                }
                "application" => {
                    manifest.debuggable = attribute(&attributes, "debuggable");
                    manifest.label = attribute(&attributes, "label");
                }
                "uses-permission" | "uses-permission-sdk-23" => {
                    manifest
                        .permissions
                        .extend(attribute(&attributes, "name"));
                }
                "activity" => manifest.activities.extend(attribute(&attributes, "name")),
                "service" => manifest.services.extend(attribute(&attributes, "name")),
                "receiver" => manifest.receivers.extend(attribute(&attributes, "name")),
                _ => {}
            }
        }

        if !found_root {
            bail!("the document has no <manifest> element");
        }
        Ok(manifest)
    }

    /// Gets the manifest document.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Gets the package name.
    pub fn package(&self) -> Result<&str> {
        self.package
            .as_deref()
            .context("the manifest does not declare a package")
    }

    /// Gets the version name.
    pub fn version_name(&self) -> Result<&str> {
        self.version_name
            .as_deref()
            .context("the manifest does not declare a version name")
    }

    /// Gets the version code.
    pub fn version_code(&self) -> Result<u32> {
        let code = self
            .version_code
            .as_deref()
            .context("the manifest does not declare a version code")?;
        code.trim()
            .parse()
            .with_context(|| format!("invalid version code `{}`", code))
    }

    /// Checks if the application is debuggable. A missing attribute means it is not.
    pub fn is_debuggable(&self) -> Result<bool> {
        match self.debuggable.as_deref() {
            None => Ok(false),
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("invalid debuggable flag `{}`", value)),
        }
    }

    /// Gets the raw application label, which may be a string resource reference.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Gets the requested permissions, in document order.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Gets the fully qualified activity names.
    pub fn activities(&self) -> Result<Vec<String>> {
        self.components(&self.activities)
    }

    /// Gets the fully qualified service names.
    pub fn services(&self) -> Result<Vec<String>> {
        self.components(&self.services)
    }

    /// Gets the fully qualified broadcast receiver names.
    pub fn receivers(&self) -> Result<Vec<String>> {
        self.components(&self.receivers)
    }

    fn components(&self, names: &[String]) -> Result<Vec<String>> {
        let package = self.package()?;
        Ok(names
            .iter()
            .map(|name| qualified_name(package, name))
            .collect())
    }
}

/// Gets the value of the attribute with the given local name.
fn attribute(attributes: &[OwnedAttribute], name: &str) -> Option<String> {
    attributes
        .iter()
        .find(|attr| attr.name.local_name == name)
        .map(|attr| attr.value.clone())
}

/// Expands a component name relative to the package.
///
/// `.Main` and `Main` both become `<package>.Main`; names containing a dot elsewhere are
/// already qualified.
fn qualified_name(package: &str, name: &str) -> String {
    if name.starts_with('.') {
        format!("{}{}", package, name)
    } else if !name.contains('.') {
        format!("{}.{}", package, name)
    } else {
        name.to_owned()
    }
}
