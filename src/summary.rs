//! Plain text digest of one validation result, printed by the command line.

use crate::tar::{SeverityCounts, Tar, TestResult};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    file_name: String,
    result: TestResult,
    date: Option<DateTime<FixedOffset>>,
    counts: SeverityCounts,
    validation_type: Option<String>,
}

impl FileSummary {
    /// Summarise `tar`. The validation type line is only printed when `show_type` is set.
    pub fn new(
        file_name: impl Into<String>,
        tar: &Tar,
        show_type: bool,
        validation_type: Option<&str>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            result: tar.result,
            date: tar.date,
            counts: tar.resolved_counts(),
            validation_type: show_type.then(|| validation_type.unwrap_or_default().to_string()),
        }
    }

    pub fn result(&self) -> TestResult {
        self.result
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation report summary [{}]:", self.file_name)?;
        if let Some(validation_type) = &self.validation_type {
            write!(f, "\n- Validation type: {validation_type}")?;
        }
        let date = self
            .date
            .map(|d| d.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            .unwrap_or_default();
        write!(f, "\n- Date: {date}")?;
        write!(f, "\n- Result: {}", self.result)?;
        write!(f, "\n- Errors: {}", self.counts.errors)?;
        write!(f, "\n- Warnings: {}", self.counts.warnings)?;
        write!(f, "\n- Messages: {}", self.counts.messages)
    }
}
