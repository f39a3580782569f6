pub mod config;
pub mod error;
pub mod expiry;
pub mod loader;
pub mod report;
pub mod scanner;
pub mod types;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};

use crate::{report::Report, types::Thresholds};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub path: PathBuf,
    pub extension: String,
    pub thresholds: Thresholds,
    /// Reference day for the day counts. [`CheckOptions::new`] uses the
    /// current UTC date, not the host's local date, so near midnight in
    /// non-UTC zones the count can be one off from a local-time check.
    pub today: NaiveDate,
}

impl CheckOptions {
    pub fn new(
        path: impl Into<PathBuf>,
        extension: impl Into<String>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
            thresholds,
            today: Utc::now().date_naive(),
        }
    }
}

/// Scan `opts.path` and fold every certificate found into one report.
///
/// Fails only on configuration problems (missing root directory, unusable
/// extension pattern); individual unreadable certificates end up in
/// [`Report::skipped`].
pub fn check_dir(opts: &CheckOptions) -> anyhow::Result<Report> {
    if !opts.path.is_dir() {
        anyhow::bail!("{} is not a valid directory", opts.path.display());
    }

    let outcome = scanner::scan_dir(&opts.path, &opts.extension, &opts.thresholds, opts.today)
        .with_context(|| format!("failed to scan {}", opts.path.display()))?;

    Ok(Report::new(&opts.path, opts.thresholds, opts.today, outcome))
}
