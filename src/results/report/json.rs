//! JSON report generation module.

use crate::{
    results::{report::Generator, Submission},
    Config,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::ser;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// JSON report generator.
#[derive(Debug, Default)]
pub struct Json {
    written: Vec<PathBuf>,
}

impl Json {
    /// Creates a new JSON report generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the reports written by this generator.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Gets the report file name for a submission received at the given time.
pub(crate) fn report_file_name(filename: &str, received: DateTime<Utc>) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map_or_else(|| filename.to_owned(), |s| s.to_string_lossy().into_owned());
    format!("{}_{}.json", received.format("%Y%m%d_%H%M%S_%6f"), stem)
}

impl Generator for Json {
    fn generate(&mut self, config: &Config, submission: &Submission) -> Result<()> {
        debug!("starting JSON report generation, first we create the results folder");
        fs::create_dir_all(config.results_folder()).with_context(|| {
            format!(
                "could not create the results folder {}",
                config.results_folder().display()
            )
        })?;

        let path = config
            .results_folder()
            .join(report_file_name(submission.filename(), Utc::now()));
        let mut f = BufWriter::new(
            File::create(&path)
                .with_context(|| format!("could not create the report {}", path.display()))?,
        );
        if config.is_pretty() {
            ser::to_writer_pretty(&mut f, submission)?;
        } else {
            ser::to_writer(&mut f, submission)?;
        }
        f.flush()?;

        info!("JSON report written to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
