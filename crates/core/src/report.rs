use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{EvaluationResult, ScanOutcome, Severity, SkippedFile, Thresholds};

/// Overall status of one run: the worst severity and the single status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub severity: Severity,
    pub line: String,
}

impl Verdict {
    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }
}

pub fn aggregate(outcome: &ScanOutcome) -> Verdict {
    // Nothing scanned is a setup problem (wrong path or extension), not an
    // expiry, so the line reads as an error while still exiting CRITICAL.
    if outcome.certificates_scanned == 0 {
        return Verdict {
            severity: Severity::Critical,
            line: format!(
                "Error: No certificate found with extension '*{}'",
                outcome.extension
            ),
        };
    }

    let severity = outcome
        .evaluations
        .iter()
        .map(|e| e.severity)
        .max()
        .unwrap_or(Severity::Ok);

    if severity > Severity::Ok {
        let messages: Vec<&str> = outcome
            .evaluations
            .iter()
            .filter(|e| e.severity > Severity::Ok)
            .filter_map(|e| e.message.as_deref())
            .collect();
        return Verdict {
            severity,
            line: format!("{}: {}", severity, messages.join(", ")),
        };
    }

    Verdict {
        severity: Severity::Ok,
        line: format!(
            "OK: All certs are ok. Monitoring domain(s): {}",
            outcome.common_names.join(", ")
        ),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_version: String,
    pub inputs: Inputs,
    pub checked_on: NaiveDate,
    pub thresholds: Thresholds,
    pub severity: Severity,
    pub summary: String,
    pub certificates: Vec<EvaluationResult>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inputs {
    pub path: String,
    pub extension: String,
}

impl Report {
    pub fn new(
        path: &Path,
        thresholds: Thresholds,
        checked_on: NaiveDate,
        outcome: ScanOutcome,
    ) -> Self {
        let verdict = aggregate(&outcome);
        Self {
            report_version: "0.1.0".to_string(),
            inputs: Inputs {
                path: path.display().to_string(),
                extension: outcome.extension,
            },
            checked_on,
            thresholds,
            severity: verdict.severity,
            summary: verdict.line,
            certificates: outcome.evaluations,
            skipped: outcome.skipped,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }

    /// Compact single-line JSON, suitable for agents that read one line.
    pub fn to_json_line(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("serialize report json")
    }
}
