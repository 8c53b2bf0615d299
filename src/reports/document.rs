//! Assembly of the renderable report model.

use super::context::{self, ContextItem};
use super::items::{self, ReportItem};
use super::labels::ReportLabels;
use crate::tar::Tar;
use chrono::Local;
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Report";
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Everything the layout needs from one validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub title: String,
    pub report_date: Option<String>,
    pub report_result: String,
    pub error_count: String,
    pub warning_count: String,
    pub message_count: String,
    /// `None` when there are no findings.
    pub report_items: Option<Vec<ReportItem>>,
    /// `None` when there is no context or `add_context` was off.
    pub context_items: Option<Vec<ContextItem>>,
}

impl ReportDocument {
    /// Build the document from `tar`. The input is only read.
    pub fn assemble(tar: &Tar, title: Option<&str>, add_context: bool) -> Self {
        let report_date = tar
            .date
            .map(|date| date.with_timezone(&Local).format(REPORT_DATE_FORMAT).to_string());

        let mut context_items = Vec::new();
        if add_context {
            if let Some(root) = &tar.context {
                context::flatten_into(root, &mut context_items);
            }
        }

        let summary = items::summarize(&tar.reports);
        let counts = tar
            .counters
            .as_ref()
            .and_then(|c| c.explicit())
            .unwrap_or(summary.counts);

        Self {
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            report_date,
            report_result: tar.result.as_str().to_string(),
            error_count: counts.errors.to_string(),
            warning_count: counts.warnings.to_string(),
            message_count: counts.messages.to_string(),
            report_items: non_empty(summary.items),
            context_items: non_empty(context_items),
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

/// Named parameters handed to a render backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameters {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    pub report_result: String,
    pub error_count: String,
    pub warning_count: String,
    pub message_count: String,
    pub overview_label: String,
    pub details_label: String,
    pub result_label: String,
    pub result_type_label: String,
    pub date_label: String,
    pub context_label: String,
    pub test_label: String,
    pub location_label: String,
    pub page_label: String,
    pub of_label: String,
    pub assertion_id_label: String,
    pub result_findings_label: String,
    pub result_findings_details_label: String,
    pub rich_text_report_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_items: Option<Vec<ReportItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_items: Option<Vec<ContextItem>>,
}

impl ReportParameters {
    pub fn new(document: ReportDocument, labels: &ReportLabels, rich_text_report_items: bool) -> Self {
        Self {
            title: document.title,
            report_date: document.report_date,
            report_result: document.report_result,
            error_count: document.error_count,
            warning_count: document.warning_count,
            message_count: document.message_count,
            overview_label: labels.overview.clone(),
            details_label: labels.details.clone(),
            result_label: labels.result.clone(),
            result_type_label: labels.result_type.clone(),
            date_label: labels.date.clone(),
            context_label: labels.context.clone(),
            test_label: labels.test.clone(),
            location_label: labels.location.clone(),
            page_label: labels.page.clone(),
            of_label: labels.of.clone(),
            assertion_id_label: labels.assertion_id.clone(),
            result_findings_label: labels.findings.clone(),
            result_findings_details_label: labels.findings_details.clone(),
            rich_text_report_items,
            report_items: document.report_items,
            context_items: document.context_items,
        }
    }
}
