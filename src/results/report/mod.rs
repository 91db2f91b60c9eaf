//! Report generation module.

mod json;

use crate::{results::Submission, Config};
use anyhow::Result;

pub use self::json::Json;

/// Trait that represents a type that can generate a report.
pub trait Generator {
    /// Generates an actual report.
    fn generate(&mut self, config: &Config, submission: &Submission) -> Result<()>;
}
