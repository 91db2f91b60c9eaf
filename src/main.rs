//! APK risk analyzer command line tool.

use anyhow::{bail, Context, Result};
use apk_risk_core::{
    analyze_package, apply_verbosity, cli::generate_cli, initialize_config, initialize_logger,
    print_risk,
};
use clap::ArgMatches;
use log::{error, warn};
use std::process::exit;

fn main() {
    let cli = generate_cli().get_matches();
    initialize_logger(cli.is_present("verbose"));

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        exit(1);
    }
}

fn run(cli: &ArgMatches<'_>) -> Result<()> {
    let config = initialize_config(cli)?;
    apply_verbosity(&config);

    let mut failed = 0;
    for package in config.packages() {
        let submission = analyze_package(package, &config);

        let json = if config.is_pretty() {
            serde_json::to_string_pretty(&submission)?
        } else {
            serde_json::to_string(&submission)?
        };
        println!("{}", json);

        match submission.result().analysis() {
            Some(analysis) => {
                if !config.is_quiet() {
                    let name = analysis
                        .info()
                        .package_name()
                        .unwrap_or_else(|| submission.filename());
                    print_risk(name, analysis.risk().label(), analysis.risk().score());
                }
            }
            None => {
                failed += 1;
                warn!(
                    "{} could not be analyzed: {}",
                    submission.filename(),
                    submission.result().error().unwrap_or_default()
                );
            }
        }

        if config.is_save_report() {
            submission.generate_report(&config).with_context(|| {
                format!(
                    "there was an error generating the report for {} in {}",
                    submission.filename(),
                    config.results_folder().display()
                )
            })?;
        }
    }

    if failed > 0 {
        bail!(
            "{} of {} packages could not be analyzed",
            failed,
            config.packages().len()
        );
    }
    Ok(())
}
