//! Conversion of findings into report items with per-severity counts.

use crate::tar::{Finding, SeverityCounts};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub level: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSummary {
    pub items: Vec<ReportItem>,
    pub counts: SeverityCounts,
}

/// Build one report item per finding, keeping the original order.
pub fn summarize(findings: &[Finding]) -> ItemSummary {
    let mut summary = ItemSummary {
        items: Vec::with_capacity(findings.len()),
        counts: SeverityCounts::default(),
    };
    for finding in findings {
        summary.counts.record(finding.level);
        summary.items.push(ReportItem {
            level: finding.level.as_str().to_string(),
            description: default_if_blank(finding.description.as_deref(), "-"),
            test: trim_to_none(finding.test.as_deref()),
            location: trim_to_none(finding.location.as_deref()),
            assertion_id: trim_to_none(finding.assertion_id.as_deref()),
        });
    }
    summary
}

fn default_if_blank(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

fn trim_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tar::Severity;

    #[test]
    fn test_counts_by_severity() {
        let findings = vec![
            Finding::new(Severity::Error, "e1"),
            Finding::new(Severity::from("WARNING"), "w1"),
            Finding::new(Severity::from("info"), "i1"),
            Finding::new(Severity::from("debug"), "i2"),
            Finding::new(Severity::Error, "e2"),
        ];
        let summary = summarize(&findings);
        assert_eq!(summary.counts.errors, 2);
        assert_eq!(summary.counts.warnings, 1);
        assert_eq!(summary.counts.messages, 2);
        assert_eq!(summary.counts.total(), findings.len() as u64);
        let descriptions: Vec<_> = summary.items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["e1", "w1", "i1", "i2", "e2"]);
        assert_eq!(summary.items[1].level, "warning");
    }

    #[test]
    fn test_blank_fields() {
        let finding = Finding {
            level: Severity::Warning,
            description: Some("   ".into()),
            test: Some("  ".into()),
            location: Some(" Line 4 ".into()),
            assertion_id: None,
        };
        let summary = summarize(&[finding]);
        let item = &summary.items[0];
        assert_eq!(item.description, "-");
        assert_eq!(item.test, None);
        assert_eq!(item.location.as_deref(), Some("Line 4"));
        assert_eq!(item.assertion_id, None);
    }

    #[test]
    fn test_missing_description_defaults() {
        let mut finding = Finding::new(Severity::Info, "");
        finding.description = None;
        assert_eq!(summarize(&[finding]).items[0].description, "-");
    }

    #[test]
    fn test_no_findings() {
        assert_eq!(summarize(&[]), ItemSummary::default());
    }
}
