//! Localised labels printed in PDF reports.

use crate::i18n::Localiser;
use crate::tar::Tar;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLabels {
    /// Report title; `Report` is used when absent.
    pub title: Option<String>,
    pub overview: String,
    pub details: String,
    pub date: String,
    pub result: String,
    pub result_type: String,
    pub context: String,
    pub test: String,
    pub location: String,
    pub page: String,
    pub of: String,
    pub assertion_id: String,
    pub findings: String,
    pub findings_details: String,
}

impl ReportLabels {
    /// Labels for `tar` taken from the message catalogue.
    pub fn from_localiser(localiser: &Localiser, tar: &Tar) -> Self {
        let counts = tar.resolved_counts();
        let findings_details = localiser.localise_with(
            "validator.label.resultFindingsDetailsLabel",
            &[
                counts.errors.to_string(),
                counts.warnings.to_string(),
                counts.messages.to_string(),
            ],
        );
        Self {
            title: Some(localiser.localise("validator.reportTitle")),
            overview: localiser.localise("validator.label.resultSubSectionOverviewTitle"),
            details: localiser.localise("validator.label.resultSubSectionDetailsTitle"),
            date: localiser.localise("validator.label.resultDateLabel"),
            result: localiser.localise("validator.label.resultResultLabel"),
            result_type: localiser.localise(&format!(
                "validator.label.result.{}",
                tar.result.as_str().to_lowercase()
            )),
            context: localiser.localise("validator.label.resultContextLabel"),
            test: localiser.localise("validator.label.resultTestLabel"),
            location: localiser.localise("validator.label.resultLocationLabel"),
            page: localiser.localise("validator.label.pageLabel"),
            of: localiser.localise("validator.label.ofLabel"),
            assertion_id: localiser.localise("validator.label.additionalInfoLabel"),
            findings: localiser.localise("validator.label.resultFindingsLabel"),
            findings_details,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
