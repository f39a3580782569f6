use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    /// Monitoring plugin exit code (Nagios/Icinga convention).
    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Day counts before expiry at which a certificate turns WARNING or CRITICAL.
///
/// Nothing forces `warning_days >= critical_days`; an inverted pair still
/// evaluates deterministically, CRITICAL taking precedence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thresholds {
    pub warning_days: u32,
    pub critical_days: u32,
}

impl Thresholds {
    pub fn new(warning_days: u32, critical_days: u32) -> Self {
        Self {
            warning_days,
            critical_days,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.critical_days > self.warning_days
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub common_name: String,
    pub not_after: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationResult {
    pub common_name: String,
    pub expires_on: NaiveDate,
    pub severity: Severity,
    pub message: Option<String>,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Everything collected while walking one directory tree.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub extension: String,
    pub evaluations: Vec<EvaluationResult>,
    pub certificates_scanned: usize,
    pub common_names: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanOutcome {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, evaluation: EvaluationResult) {
        self.common_names.push(evaluation.common_name.clone());
        self.evaluations.push(evaluation);
        self.certificates_scanned += 1;
    }

    pub fn skip(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }
}
