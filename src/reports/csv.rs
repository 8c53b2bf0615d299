//! CSV export of validation findings.

use super::RenderError;
use crate::error::ValidatorError;
use crate::i18n::Localiser;
use crate::tar::{Finding, Severity, Tar};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const UNABLE_TO_GENERATE_CSV_REPORT: &str = "validator.label.exception.unableToGenerateCSVReport";

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Writes one CSV row per finding.
///
/// The `Test` and `Additional information` columns only appear when at least
/// one finding carries a test or an assertion id.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    localiser: Localiser,
    add_bom: bool,
}

impl CsvReportWriter {
    pub fn new(localiser: Localiser) -> Self {
        Self {
            localiser,
            add_bom: false,
        }
    }

    /// Prefix the output with a UTF-8 byte order mark.
    pub fn with_bom(mut self, add_bom: bool) -> Self {
        self.add_bom = add_bom;
        self
    }

    /// Write the findings of `tar` to `out`. The stream is flushed on every path.
    pub fn write_tar_report(&self, tar: &Tar, out: &mut dyn Write) -> Result<(), RenderError> {
        let written = self.write_rows(&tar.reports, &mut *out);
        let flushed = out.flush();
        written?;
        flushed?;
        Ok(())
    }

    fn write_rows(&self, findings: &[Finding], out: &mut dyn Write) -> Result<(), RenderError> {
        if self.add_bom {
            out.write_all(BOM)?;
        }
        let with_test = findings.iter().any(|f| f.test.is_some());
        let with_assertion_id = findings.iter().any(|f| f.assertion_id.is_some());

        let mut writer = csv::Writer::from_writer(out);
        let mut header = vec![
            self.localiser.localise("validator.label.csvHeaderLevel"),
            self.localiser.localise("validator.label.csvHeaderDescription"),
            self.localiser.localise("validator.label.csvHeaderLocation"),
        ];
        if with_test {
            header.push(self.localiser.localise("validator.label.csvHeaderTest"));
        }
        if with_assertion_id {
            header.push(self.localiser.localise("validator.label.csvHeaderAdditionalInfo"));
        }
        writer.write_record(&header)?;

        for finding in findings {
            let mut row = vec![
                self.level(finding.level),
                finding.description.clone().unwrap_or_default(),
                finding.location.clone().unwrap_or_default(),
            ];
            if with_test {
                row.push(finding.test.clone().unwrap_or_default());
            }
            if with_assertion_id {
                row.push(finding.assertion_id.clone().unwrap_or_default());
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn level(&self, level: Severity) -> String {
        let key = match level {
            Severity::Error => "validator.label.csvLevelError",
            Severity::Warning => "validator.label.csvLevelWarning",
            Severity::Info => "validator.label.csvLevelMessage",
        };
        self.localiser.localise(key)
    }

    /// Write the CSV report of `tar` to `out_path`.
    pub fn write_report(&self, tar: &Tar, out_path: &Path) -> Result<(), ValidatorError> {
        let result = File::create(out_path)
            .map_err(RenderError::from)
            .and_then(|file| self.write_tar_report(tar, &mut BufWriter::new(file)));
        result.map_err(|e| {
            tracing::error!("Unable to generate CSV report {}: {e}", out_path.display());
            ValidatorError::display_with_source(UNABLE_TO_GENERATE_CSV_REPORT, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tar::TestResult;

    fn writer() -> CsvReportWriter {
        CsvReportWriter::new(Localiser::english().unwrap())
    }

    fn render(writer: &CsvReportWriter, tar: &Tar) -> String {
        let mut out = Vec::<u8>::new();
        writer.write_tar_report(tar, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_basic_columns() {
        let mut tar = Tar::new(TestResult::Failure);
        tar.reports = vec![
            Finding::new(Severity::Error, "Missing buyer").with_location("Line 3"),
            Finding::new(Severity::Warning, "Odd, but allowed"),
            Finding::new(Severity::Info, "Note"),
        ];
        assert_eq!(
            render(&writer(), &tar),
            "Level,Description,Location\n\
             Error,Missing buyer,Line 3\n\
             Warning,\"Odd, but allowed\",\n\
             Message,Note,\n"
        );
    }

    #[test]
    fn test_optional_columns() {
        let mut tar = Tar::new(TestResult::Failure);
        let mut with_id = Finding::new(Severity::Error, "Bad total");
        with_id.assertion_id = Some("BR-07".into());
        tar.reports = vec![Finding::new(Severity::Error, "No test").with_test("//total"), with_id];
        assert_eq!(
            render(&writer(), &tar),
            "Level,Description,Location,Test,Additional information\n\
             Error,No test,,//total,\n\
             Error,Bad total,,,BR-07\n"
        );
    }

    #[test]
    fn test_bom_and_empty_result() {
        let out = render(&writer().with_bom(true), &Tar::new(TestResult::Success));
        assert!(out.starts_with('\u{feff}'));
        assert_eq!(out.trim_start_matches('\u{feff}'), "Level,Description,Location\n");
    }

    #[test]
    fn test_write_failure_is_displayable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("report.csv");
        let err = writer().write_report(&Tar::new(TestResult::Success), &missing).unwrap_err();
        let localiser = Localiser::english().unwrap();
        assert_eq!(err.message_for_display(&localiser), "Unable to generate CSV report.");
    }
}
