//! Utilities module.

use colored::Colorize;
use std::path::Path;

#[cfg(feature = "apk")]
use anyhow::Result;
#[cfg(feature = "apk")]
use std::fs;
#[cfg(feature = "apk")]
use xml::{
    reader::{EventReader, XmlEvent},
    ParserConfig,
};

use crate::risk::RiskLabel;

/// Configuration for the XML parser.
#[cfg(feature = "apk")]
pub fn parser_config() -> ParserConfig {
    ParserConfig::new()
        .trim_whitespace(true)
        .whitespace_to_characters(false)
        .cdata_to_characters(false)
        .ignore_comments(true)
        .coalesce_characters(true)
}

/// Formats a coloured one line risk summary for a package.
pub fn risk_summary<S: AsRef<str>>(package: S, label: RiskLabel, score: u8) -> String {
    let start = format!("{} risk ({}/10):", label, score);
    let (start, package) = match label {
        RiskLabel::Low => (start.green(), package.as_ref().green()),
        RiskLabel::Medium => (start.yellow(), package.as_ref().yellow()),
        RiskLabel::High => (start.red(), package.as_ref().red()),
    };
    format!("{} {}", start.bold(), package)
}

/// Prints the risk summary of a package to the standard error, keeping the standard output
/// for the JSON results.
pub fn print_risk<S: AsRef<str>>(package: S, label: RiskLabel, score: u8) {
    eprintln!("{}", risk_summary(package, label, score));
}

/// Checks if the given path exists.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Gets the file name of the package, used to name it in results.
pub fn get_package_name<P: AsRef<Path>>(package: P) -> String {
    package.as_ref().file_name().map_or_else(
        || package.as_ref().display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Gets the string resource with the given name from the decoded resources of a package.
///
/// English resources are preferred over the default ones.
#[cfg(feature = "apk")]
pub fn get_string<L: AsRef<str>, P: AsRef<Path>>(label: L, decoded: P) -> Result<Option<String>> {
    let english = decoded.as_ref().join("res/values-en/strings.xml");
    let path = if file_exists(&english) {
        english
    } else {
        decoded.as_ref().join("res/values/strings.xml")
    };
    let code = fs::read_to_string(&path)?;

    find_string(label.as_ref(), &code)
}

/// Searches the string with the given name in a `strings.xml` document.
#[cfg(feature = "apk")]
fn find_string(label: &str, code: &str) -> Result<Option<String>> {
    let parser = EventReader::new_with_config(code.as_bytes(), parser_config());

    let mut found = false;
    for e in parser {
        match e? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                found = name.local_name == "string"
                    && attributes
                        .iter()
                        .any(|attr| attr.name.local_name == "name" && attr.value == label);
            }
            XmlEvent::Characters(data) => {
                if found {
                    return Ok(Some(data));
                }
            }
            XmlEvent::EndElement { .. } => {
                if found {
                    return Ok(Some(String::new()));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{file_exists, get_package_name, risk_summary};
    use crate::risk::RiskLabel;
    use std::{fs::File, path::Path};

    #[test]
    fn it_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        assert!(!file_exists(&path));
        let _ = File::create(&path).unwrap();
        assert!(file_exists(&path));
    }

    #[test]
    fn it_risk_summary() {
        let high = risk_summary("com.example.flashlight", RiskLabel::High, 6);
        assert!(high.contains("High risk (6/10):"));
        assert!(high.contains("com.example.flashlight"));

        let low = risk_summary("plain.apk", RiskLabel::Low, 0);
        assert!(low.contains("Low risk (0/10):"));
        assert!(low.contains("plain.apk"));
    }

    #[test]
    fn it_get_package_name() {
        assert_eq!(get_package_name(Path::new("uploads/app-release.apk")), "app-release.apk");
        assert_eq!(get_package_name("plain.apk"), "plain.apk");
    }

    #[cfg(feature = "apk")]
    #[test]
    fn it_find_string() {
        let code = r#"<?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="hint">Type here</string>
                <string name="app_name">Flashlight Pro</string>
                <string name="empty"></string>
            </resources>"#;

        assert_eq!(
            super::find_string("app_name", code).unwrap(),
            Some("Flashlight Pro".to_owned())
        );
        assert_eq!(super::find_string("empty", code).unwrap(), Some(String::new()));
        assert_eq!(super::find_string("missing", code).unwrap(), None);
    }

    #[cfg(feature = "apk")]
    #[test]
    fn it_get_string_prefers_english() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("res/values")).unwrap();
        std::fs::create_dir_all(dir.path().join("res/values-en")).unwrap();
        std::fs::write(
            dir.path().join("res/values/strings.xml"),
            r#"<resources><string name="app_name">Linterna</string></resources>"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("res/values-en/strings.xml"),
            r#"<resources><string name="app_name">Flashlight</string></resources>"#,
        )
        .unwrap();

        assert_eq!(
            super::get_string("app_name", dir.path()).unwrap(),
            Some("Flashlight".to_owned())
        );
    }
}
