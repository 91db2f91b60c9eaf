//! APK risk analyzer
//!
//! Extracts the permissions, components, embedded URLs and signing certificates of an Android
//! package, and turns them into an explainable risk score, label and installation
//! recommendation.

#![forbid(
    overflowing_literals,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true,
    non_shorthand_field_patterns,
    improper_ctypes
)]
#![deny(unused_attributes, unused_extern_crates)]
#![warn(missing_docs, unused_qualifications, unused_imports, unused_variables, dead_code)]

/// Command Line Interface
pub mod cli;
mod config;
pub mod error;
pub mod package;
pub mod results;
pub mod risk;
pub mod static_analysis;
mod utils;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use env_logger::Builder;
use log::{debug, info, warn, Level, LevelFilter};
use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

pub use crate::{
    config::Config,
    error::ErrorKind,
    results::{AnalysisResult, Submission},
    risk::{Recommendation, RiskAssessment, RiskLabel},
    static_analysis::{static_analysis, StaticAnalysis},
    utils::{get_package_name, print_risk, risk_summary},
};
use crate::package::PackageParser;

/// Error message returned when the crate was built without a package parser.
pub const PARSER_UNAVAILABLE: &str =
    "APK parser is not available. Rebuild with the `apk` feature enabled.";

/// Initialize the config with the config files and command line options.
///
/// A file given with `--config` is always used. Otherwise, on UNIX, if the local file
/// (`config.toml`) does not exist but the global one does (`/etc/apk-risk/config.toml`), the
/// latter is used. If none of the files could be loaded, the default config is used.
pub fn initialize_config(cli: &ArgMatches<'_>) -> Result<Config> {
    let config_path = PathBuf::from("config.toml");
    let global_config_path = PathBuf::from("/etc/apk-risk/config.toml");

    let mut config = if let Some(path) = cli.value_of("config") {
        Config::from_file(path)
            .with_context(|| format!("there was an error when reading the {} file", path))?
    } else if cfg!(target_family = "unix") && !config_path.exists() && global_config_path.exists()
    {
        Config::from_file(&global_config_path).context(
            "there was an error when reading the /etc/apk-risk/config.toml file",
        )?
    } else if config_path.exists() {
        Config::from_file(&config_path)
            .context("there was an error when reading the config.toml file")?
    } else {
        warn!("config file not found, using default configuration");
        Config::default()
    };

    config
        .decorate_with_cli(cli)
        .context("there was an error reading config from CLI")?;

    Ok(config)
}

/// Analyzes the package at the given path.
///
/// The result is a failure only if the package cannot be parsed at all. Any single fact that
/// cannot be extracted is left empty.
pub fn analyze<P: AsRef<Path>>(package: P) -> AnalysisResult {
    match open_and_analyze(package.as_ref()) {
        Ok(result) => result,
        Err(e) => {
            debug!("could not parse {}: {:#}", package.as_ref().display(), e);
            AnalysisResult::failure(format!("Failed to parse APK: {}", e))
        }
    }
}

#[cfg(feature = "apk")]
fn open_and_analyze(package: &Path) -> Result<AnalysisResult> {
    let apk = crate::package::Apk::open(package)?;
    Ok(analyze_parsed(&apk))
}

#[cfg(not(feature = "apk"))]
fn open_and_analyze(package: &Path) -> Result<AnalysisResult> {
    debug!("no package parser available for {}", package.display());
    Ok(AnalysisResult::failure(PARSER_UNAVAILABLE))
}

/// Analyzes an already parsed package.
pub fn analyze_parsed<P: PackageParser>(package: &P) -> AnalysisResult {
    AnalysisResult::from(static_analysis(package))
}

/// Bytes in a mebibyte, the unit of the size limit message.
const MIB: u64 = 1024 * 1024;

/// Checks the given file against the configured limits and analyzes it.
///
/// The returned submission carries the file name next to the result, and the SHA-256 digest of
/// every file that was not rejected.
pub fn analyze_package<P: AsRef<Path>>(package: P, config: &Config) -> Submission {
    let package = package.as_ref();

    if !config.is_extension_allowed(package) {
        let allowed = config
            .allowed_extensions()
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        warn!("rejecting {}: unsupported extension", package.display());
        return Submission::rejected(
            package,
            AnalysisResult::failure(ErrorKind::UnsupportedExtension { allowed }.to_string()),
        );
    }

    match fs::metadata(package) {
        Ok(metadata) if metadata.len() > config.max_package_size() => {
            warn!(
                "rejecting {}: {} bytes is over the limit",
                package.display(),
                metadata.len()
            );
            let limit = config.max_package_size();
            let max_mb = limit / MIB + u64::from(limit % MIB != 0);
            return Submission::rejected(
                package,
                AnalysisResult::failure(ErrorKind::PackageTooLarge { max_mb }.to_string()),
            );
        }
        Ok(_) => {}
        Err(e) => debug!("could not read the size of {}: {}", package.display(), e),
    }

    info!("starting analysis of {}", get_package_name(package));
    Submission::new(package, analyze(package))
}

/// Initializes the logger.
///
/// `RUST_LOG` takes precedence; otherwise the analyzer logs at info level, or debug level in
/// verbose mode. The level can be changed later with [`apply_verbosity`].
pub fn initialize_logger(is_verbose: bool) {
    let mut builder = Builder::new();
    let _ = builder.format(|buf, record| match record.level() {
        Level::Warn => writeln!(
            buf,
            "{}{}",
            "Warning: ".bold().yellow(),
            record.args().to_string().yellow()
        ),
        Level::Error => writeln!(
            buf,
            "{}{}",
            "Error: ".bold().red(),
            record.args().to_string().red()
        ),
        Level::Debug => writeln!(
            buf,
            "{}{}",
            "Debug: ".bold(),
            record.args().to_string().bold()
        ),
        Level::Info => writeln!(buf, "{}", record.args()),
        _ => writeln!(buf, "{}: {}", record.level(), record.args()),
    });

    // The filter admits debug records so that the global maximum level alone decides.
    if let Ok(env_log) = env::var("RUST_LOG") {
        let _ = builder.parse_filters(&env_log);
    } else {
        let _ = builder
            .filter(Some("apk_risk"), LevelFilter::Debug)
            .filter(Some("apk_risk_core"), LevelFilter::Debug);
    }

    match builder.try_init() {
        Ok(()) => set_verbosity(is_verbose),
        Err(e) => eprintln!("Could not initialize logger: {}", e),
    }
}

/// Applies the verbosity of the loaded configuration to the logger.
///
/// Has no effect when `RUST_LOG` is set.
pub fn apply_verbosity(config: &Config) {
    set_verbosity(config.is_verbose());
}

fn set_verbosity(is_verbose: bool) {
    if env::var_os("RUST_LOG").is_none() {
        log::set_max_level(verbosity_level(is_verbose));
    }
}

fn verbosity_level(is_verbose: bool) -> LevelFilter {
    if is_verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
