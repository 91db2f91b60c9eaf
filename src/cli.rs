//! Command line interface definition.
//!
//! Shared with the build script, which generates the shell completions from it.

use clap::{crate_version, App, Arg};

/// Generates the command line interface.
pub fn generate_cli() -> App<'static, 'static> {
    App::new("APK Risk")
        .version(crate_version!())
        .about("Scores the installation risk of Android application packages")
        .arg(
            Arg::with_name("packages")
                .help("Packages to analyze")
                .value_name("PACKAGE")
                .required(true)
                .multiple(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("Loads the configuration from the given TOML file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .conflicts_with("quiet")
                .help("If you'd like the analyzer to explain what it's doing"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Only prints the JSON results"),
        )
        .arg(
            Arg::with_name("pretty")
                .long("pretty")
                .help("Pretty prints the JSON results"),
        )
        .arg(
            Arg::with_name("save")
                .long("save")
                .help("Saves a JSON report of every package in the results folder"),
        )
        .arg(
            Arg::with_name("results")
                .long("results")
                .value_name("RESULTS")
                .takes_value(true)
                .help("Sets the folder where reports are saved"),
        )
        .arg(
            Arg::with_name("max-size")
                .long("max-size")
                .value_name("BYTES")
                .takes_value(true)
                .help("Sets the maximum accepted package size, in bytes"),
        )
}
