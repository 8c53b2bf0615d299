//! Merging of repeated findings into one item per kind.
//!
//! Findings are grouped by a classifier (level and description by default).
//! The first finding of each group is kept, in order of first appearance, and
//! groups seen more than once get their description prefixed with the number
//! of occurrences.

use crate::i18n::Localiser;
use crate::tar::{ContextNode, Counters, Finding, Severity, Tar};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const TOTAL_OCCURRENCES_KEY: &str = "validator.label.reportItemTotalOccurrences";

/// Groups findings by `level|description`.
pub fn default_classifier(finding: &Finding) -> String {
    format!(
        "{}|{}",
        finding.level.as_str(),
        finding.description.as_deref().unwrap_or_default()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    first: Finding,
    occurrences: usize,
}

/// Collects findings and merges the ones sharing a classification.
pub struct FindingAggregator<F = fn(&Finding) -> String> {
    classifier: F,
    groups: Vec<Group>,
    positions: HashMap<String, usize>,
}

impl FindingAggregator {
    pub fn new() -> Self {
        Self::with_classifier(default_classifier)
    }
}

impl Default for FindingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FindingAggregator<F>
where
    F: Fn(&Finding) -> String,
{
    pub fn with_classifier(classifier: F) -> Self {
        Self {
            classifier,
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn add(&mut self, finding: &Finding) {
        let key = (self.classifier)(finding);
        match self.positions.get(&key) {
            Some(&index) => self.groups[index].occurrences += 1,
            None => {
                self.positions.insert(key, self.groups.len());
                self.groups.push(Group {
                    first: finding.clone(),
                    occurrences: 1,
                });
            }
        }
    }

    pub fn extend<'a>(&mut self, findings: impl IntoIterator<Item = &'a Finding>) {
        for finding in findings {
            self.add(finding);
        }
    }

    /// Number of distinct groups so far.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One finding per group, in order of first appearance.
    pub fn into_findings(self, localiser: &Localiser) -> Vec<Finding> {
        self.groups
            .into_iter()
            .map(|group| {
                let mut finding = group.first;
                if group.occurrences > 1 {
                    let total = localiser.localise_with(TOTAL_OCCURRENCES_KEY, &[group.occurrences.to_string()]);
                    let description = finding.description.as_deref().unwrap_or_default();
                    finding.description = Some(format!("[{total}] {description}"));
                }
                finding
            })
            .collect()
    }
}

/// Aggregate `findings` with the default classifier.
pub fn aggregate_findings(findings: &[Finding], localiser: &Localiser) -> Vec<Finding> {
    let mut aggregator = FindingAggregator::new();
    aggregator.extend(findings);
    aggregator.into_findings(localiser)
}

/// A copy of `tar` with aggregated findings.
///
/// Date and result are kept. The counts of the input are carried as explicit
/// counters so they still describe every finding. A context is replaced by an
/// empty one.
pub fn aggregate_tar(tar: &Tar, localiser: &Localiser) -> Tar {
    let counts = tar.resolved_counts();
    Tar {
        date: tar.date,
        result: tar.result,
        counters: Some(Counters {
            nr_of_errors: Some(counts.errors),
            nr_of_warnings: Some(counts.warnings),
            nr_of_assertions: Some(counts.messages),
        }),
        context: tar.context.as_ref().map(|_| ContextNode::composite("", Vec::new())),
        reports: aggregate_findings(&tar.reports, localiser),
    }
}

/// Errors first, then warnings, then everything else.
pub fn severity_order(a: &Finding, b: &Finding) -> Ordering {
    rank(a.level).cmp(&rank(b.level))
}

/// Stable sort by severity; findings of one level keep their relative order.
pub fn sort_by_severity(findings: &mut [Finding]) {
    findings.sort_by(severity_order);
}

fn rank(level: Severity) -> u8 {
    match level {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tar::TestResult;

    fn findings() -> Vec<Finding> {
        vec![
            Finding::new(Severity::Error, "Error 1").with_location("Location 1"),
            Finding::new(Severity::Error, "Error 2").with_location("Location 2"),
            Finding::new(Severity::Error, "Error 1").with_location("Location 3"),
            Finding::new(Severity::Error, "Error 1").with_location("Location 4"),
            Finding::new(Severity::Warning, "Error 2").with_location("Location 5"),
            Finding::new(Severity::Info, "Error 3").with_location("Location 6"),
        ]
    }

    fn localiser() -> Localiser {
        Localiser::english().unwrap()
    }

    #[test]
    fn test_aggregates_by_level_and_description() {
        let aggregated = aggregate_findings(&findings(), &localiser());
        let summary: Vec<(Severity, &str, &str)> = aggregated
            .iter()
            .map(|f| {
                (
                    f.level,
                    f.description.as_deref().unwrap(),
                    f.location.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (Severity::Error, "[3 occurrences] Error 1", "Location 1"),
                (Severity::Error, "Error 2", "Location 2"),
                (Severity::Warning, "Error 2", "Location 5"),
                (Severity::Info, "Error 3", "Location 6"),
            ]
        );
    }

    #[test]
    fn test_custom_classifier() {
        let mut aggregator = FindingAggregator::with_classifier(|f: &Finding| f.level.as_str().to_string());
        aggregator.extend(&findings());
        assert_eq!(aggregator.len(), 3);
        let aggregated = aggregator.into_findings(&localiser());
        assert_eq!(aggregated[0].description.as_deref(), Some("[4 occurrences] Error 1"));
        assert_eq!(aggregated[1].description.as_deref(), Some("Error 2"));
    }

    #[test]
    fn test_occurrence_label_is_localised() {
        let overrides = HashMap::from([(TOTAL_OCCURRENCES_KEY.to_string(), "Total {0}".to_string())]);
        let localiser = Localiser::with_overrides(&overrides).unwrap();
        let aggregated = aggregate_findings(&findings(), &localiser);
        assert_eq!(aggregated[0].description.as_deref(), Some("[Total 3] Error 1"));
    }

    #[test]
    fn test_missing_descriptions_group_together() {
        let blank = Finding {
            description: None,
            ..Finding::new(Severity::Info, "")
        };
        let aggregated = aggregate_findings(&[blank.clone(), blank], &localiser());
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].description.as_deref(), Some("[2 occurrences] "));
    }

    #[test]
    fn test_aggregate_tar_keeps_counts() {
        let mut tar = Tar::new(TestResult::Failure);
        tar.context = Some(ContextNode::scalar("input", "data"));
        tar.reports = findings();
        let aggregated = aggregate_tar(&tar, &localiser());

        assert_eq!(aggregated.result, TestResult::Failure);
        assert_eq!(aggregated.reports.len(), 4);
        assert_eq!(aggregated.resolved_counts(), tar.resolved_counts());
        assert_eq!(aggregated.context, Some(ContextNode::composite("", Vec::new())));

        tar.context = None;
        assert_eq!(aggregate_tar(&tar, &localiser()).context, None);
    }

    #[test]
    fn test_sort_by_severity_is_stable() {
        let mut items = findings();
        items.reverse();
        sort_by_severity(&mut items);
        let order: Vec<(Severity, &str)> = items
            .iter()
            .map(|f| (f.level, f.location.as_deref().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Severity::Error, "Location 4"),
                (Severity::Error, "Location 3"),
                (Severity::Error, "Location 2"),
                (Severity::Error, "Location 1"),
                (Severity::Warning, "Location 5"),
                (Severity::Info, "Location 6"),
            ]
        );
        assert_eq!(severity_order(&items[0], &items[1]), Ordering::Equal);
    }
}
