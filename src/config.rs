//! Configuration module.
//!
//! Handles and configures the initial settings and variables needed to run the analyzer. The
//! configuration is built from the built-in defaults, then a `config.toml` file and finally the
//! command line arguments.

use crate::error::ErrorKind;
use anyhow::{Context, Result};
use clap::ArgMatches;
use log::warn;
use std::{
    fs,
    path::{Path, PathBuf},
};
use toml::Value;

/// Default maximum size of a package, 100 MiB.
const DEFAULT_MAX_PACKAGE_SIZE: u64 = 100 * 1024 * 1024;

/// Configuration of the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Folder where the reports are written.
    results_folder: PathBuf,
    /// Maximum accepted package size, in bytes.
    max_package_size: u64,
    /// Accepted package extensions, without the dot.
    allowed_extensions: Vec<String>,
    /// Whether JSON output is pretty printed.
    pretty: bool,
    /// Verbose output.
    verbose: bool,
    /// Quiet output.
    quiet: bool,
    /// Whether reports are written to the results folder.
    save_report: bool,
    /// Packages to analyze.
    packages: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_folder: PathBuf::from("results"),
            max_package_size: DEFAULT_MAX_PACKAGE_SIZE,
            allowed_extensions: vec!["apk".to_owned()],
            pretty: false,
            verbose: false,
            quiet: false,
            save_report: false,
            packages: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new configuration from the given TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Self::from_toml(&contents)
    }

    /// Creates a new configuration from the contents of a TOML document.
    ///
    /// Values with the wrong type are reported and ignored, keeping the default.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let toml: Value = toml::from_str(contents).map_err(|e| ErrorKind::Config {
            message: e.to_string(),
        })?;
        let table = toml.as_table().ok_or_else(|| ErrorKind::Config {
            message: "the configuration must be a TOML table".to_owned(),
        })?;

        let mut config = Self::default();
        for (key, value) in table {
            match key.as_str() {
                "results_folder" => match value {
                    Value::String(s) => config.results_folder = PathBuf::from(s),
                    _ => warn!(
                        "the 'results_folder' option in config.toml must be a string, using \
                         default"
                    ),
                },
                "max_package_size" => match value.as_integer() {
                    Some(size) if size > 0 => config.max_package_size = size as u64,
                    _ => warn!(
                        "the 'max_package_size' option in config.toml must be a positive \
                         integer, using default"
                    ),
                },
                "allowed_extensions" => match extensions(value) {
                    Some(allowed) => config.allowed_extensions = allowed,
                    None => warn!(
                        "the 'allowed_extensions' option in config.toml must be a non-empty \
                         array of strings, using default"
                    ),
                },
                "pretty" => match value {
                    Value::Boolean(b) => config.pretty = *b,
                    _ => warn!("the 'pretty' option in config.toml must be a boolean, using default"),
                },
                "verbose" => match value {
                    Value::Boolean(b) => config.verbose = *b,
                    _ => warn!("the 'verbose' option in config.toml must be a boolean, using default"),
                },
                "quiet" => match value {
                    Value::Boolean(b) => config.quiet = *b,
                    _ => warn!("the 'quiet' option in config.toml must be a boolean, using default"),
                },
                "save_report" => match value {
                    Value::Boolean(b) => config.save_report = *b,
                    _ => warn!(
                        "the 'save_report' option in config.toml must be a boolean, using default"
                    ),
                },
                _ => warn!("unknown configuration option '{}' in config.toml", key),
            }
        }

        Ok(config)
    }

    /// Applies the command line arguments on top of the loaded configuration.
    pub fn decorate_with_cli(&mut self, cli: &ArgMatches<'_>) -> Result<()> {
        if cli.is_present("verbose") {
            self.verbose = true;
            self.quiet = false;
        }
        if cli.is_present("quiet") {
            self.quiet = true;
            self.verbose = false;
        }
        if cli.is_present("pretty") {
            self.pretty = true;
        }
        if cli.is_present("save") {
            self.save_report = true;
        }
        if let Some(results) = cli.value_of("results") {
            self.results_folder = PathBuf::from(results);
        }
        if let Some(size) = cli.value_of("max-size") {
            self.max_package_size = size.parse().map_err(|_| ErrorKind::Config {
                message: format!("invalid maximum package size `{}`", size),
            })?;
        }
        if let Some(packages) = cli.values_of("packages") {
            self.packages = packages.map(PathBuf::from).collect();
        }

        Ok(())
    }

    /// Gets the folder where reports are written.
    pub fn results_folder(&self) -> &Path {
        &self.results_folder
    }

    /// Sets the folder where reports are written.
    pub fn set_results_folder<P: Into<PathBuf>>(&mut self, folder: P) {
        self.results_folder = folder.into();
    }

    /// Gets the maximum accepted package size, in bytes.
    pub fn max_package_size(&self) -> u64 {
        self.max_package_size
    }

    /// Sets the maximum accepted package size, in bytes.
    pub fn set_max_package_size(&mut self, size: u64) {
        self.max_package_size = size;
    }

    /// Gets the accepted package extensions, without the leading dot.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Checks if the given path has one of the accepted extensions.
    pub fn is_extension_allowed<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().extension().map_or(false, |ext| {
            let ext = ext.to_string_lossy();
            self.allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        })
    }

    /// Returns true if the JSON output should be pretty printed.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Returns true if the application is running in `--verbose` mode.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns true if the application is running in `--quiet` mode.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Returns true if reports must be written to the results folder.
    pub fn is_save_report(&self) -> bool {
        self.save_report
    }

    /// Gets the packages to analyze.
    pub fn packages(&self) -> &[PathBuf] {
        &self.packages
    }
}

/// Reads a non-empty array of extensions, stripping any leading dot.
fn extensions(value: &Value) -> Option<Vec<String>> {
    let array = value.as_array()?;
    let extensions = array
        .iter()
        .map(|v| v.as_str().map(|s| s.trim_start_matches('.').to_lowercase()))
        .collect::<Option<Vec<_>>>()?;
    if extensions.is_empty() {
        None
    } else {
        Some(extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_MAX_PACKAGE_SIZE};
    use crate::{cli::generate_cli, error::ErrorKind};
    use std::path::{Path, PathBuf};

    #[test]
    fn it_config() {
        let config = Config::default();

        assert_eq!(config.results_folder(), Path::new("results"));
        assert_eq!(config.max_package_size(), 100 * 1024 * 1024);
        assert_eq!(config.allowed_extensions(), &["apk".to_owned()]);
        assert!(!config.is_pretty());
        assert!(!config.is_verbose());
        assert!(!config.is_quiet());
        assert!(!config.is_save_report());
        assert!(config.packages().is_empty());

        assert!(config.is_extension_allowed("app.apk"));
        assert!(config.is_extension_allowed("APP.APK"));
        assert!(!config.is_extension_allowed("app.zip"));
        assert!(!config.is_extension_allowed("apk"));
    }

    #[test]
    fn it_config_from_toml() {
        let config = Config::from_toml(
            r#"
            results_folder = "/var/lib/apk-risk"
            max_package_size = 1048576
            allowed_extensions = [".apk", "xapk"]
            pretty = true
            save_report = true
            "#,
        )
        .unwrap();

        assert_eq!(config.results_folder(), Path::new("/var/lib/apk-risk"));
        assert_eq!(config.max_package_size(), 1_048_576);
        assert_eq!(
            config.allowed_extensions(),
            &["apk".to_owned(), "xapk".to_owned()]
        );
        assert!(config.is_pretty());
        assert!(config.is_save_report());
        assert!(config.is_extension_allowed("bundle.xapk"));
    }

    #[test]
    fn it_config_keeps_defaults_on_wrong_types() {
        let config = Config::from_toml(
            r#"
            results_folder = 3
            max_package_size = -10
            allowed_extensions = []
            pretty = "yes"
            unknown = true
            "#,
        )
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn it_config_rejects_invalid_toml() {
        let error = Config::from_toml("results_folder = ").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::Config { .. })
        ));
    }

    #[test]
    fn it_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "quiet = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.is_quiet());
        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn it_decorate_with_cli() {
        let matches = generate_cli().get_matches_from(vec![
            "apk-risk",
            "-v",
            "--pretty",
            "--save",
            "--results",
            "out",
            "--max-size",
            "2048",
            "first.apk",
            "second.apk",
        ]);

        let mut config = Config::default();
        config.decorate_with_cli(&matches).unwrap();

        assert!(config.is_verbose());
        assert!(!config.is_quiet());
        assert!(config.is_pretty());
        assert!(config.is_save_report());
        assert_eq!(config.results_folder(), Path::new("out"));
        assert_eq!(config.max_package_size(), 2048);
        assert_eq!(
            config.packages(),
            &[PathBuf::from("first.apk"), PathBuf::from("second.apk")]
        );
    }

    #[test]
    fn it_decorate_with_invalid_size() {
        let matches =
            generate_cli().get_matches_from(vec!["apk-risk", "--max-size", "big", "a.apk"]);

        let mut config = Config::default();
        assert!(config.decorate_with_cli(&matches).is_err());
        assert_eq!(config.max_package_size(), DEFAULT_MAX_PACKAGE_SIZE);
    }
}
