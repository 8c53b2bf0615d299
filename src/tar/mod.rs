//! Validation result model (TAR).
//!
//! The validation engine produces these documents; this crate only reads them.
//! They are accepted as JSON or YAML using the camelCase field names of the
//! engine's result schema:
//!
//! ```json
//! {
//!   "date": "2024-03-01T10:15:30+01:00",
//!   "result": "FAILURE",
//!   "counters": { "nrOfErrors": 1, "nrOfWarnings": 0, "nrOfAssertions": 0 },
//!   "context": { "type": "map", "item": [
//!     { "name": "input", "type": "string", "value": "<Invoice/>", "embeddingMethod": "STRING" }
//!   ]},
//!   "reports": [
//!     { "level": "error", "description": "Missing buyer", "location": "Line 3" }
//!   ]
//! }
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TarError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON validation result: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML validation result: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("unsupported validation result format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    #[serde(alias = "success")]
    Success,
    #[serde(alias = "warning")]
    Warning,
    #[serde(alias = "failure")]
    Failure,
}

impl TestResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a finding. Any tag other than `error` or `warning` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl From<&str> for Severity {
    fn from(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("error") {
            Self::Error
        } else if tag.eq_ignore_ascii_case("warning") {
            Self::Warning
        } else {
            Self::Info
        }
    }
}

impl From<String> for Severity {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: u64,
    pub warnings: u64,
    pub messages: u64,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.messages += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.errors + self.warnings + self.messages
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub nr_of_errors: Option<u64>,
    pub nr_of_warnings: Option<u64>,
    pub nr_of_assertions: Option<u64>,
}

impl Counters {
    /// The counters as a whole, only when all three are present.
    pub fn explicit(&self) -> Option<SeverityCounts> {
        Some(SeverityCounts {
            errors: self.nr_of_errors?,
            warnings: self.nr_of_warnings?,
            messages: self.nr_of_assertions?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub level: Severity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "assertionID")]
    pub assertion_id: Option<String>,
}

impl Finding {
    pub fn new(level: Severity, description: impl Into<String>) -> Self {
        Self {
            level,
            description: Some(description.into()),
            test: None,
            location: None,
            assertion_id: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueEmbedding {
    #[default]
    #[serde(rename = "STRING", alias = "string")]
    String,
    #[serde(rename = "URI", alias = "uri")]
    Uri,
    #[serde(rename = "BASE64", alias = "base64", alias = "BASE_64")]
    Base64,
}

/// A node of the context tree attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawContent")]
pub enum ContextNode {
    Scalar {
        name: String,
        value: Option<String>,
        embedding: ValueEmbedding,
    },
    Composite {
        name: String,
        items: Vec<ContextNode>,
    },
}

impl ContextNode {
    pub fn scalar(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            value: Some(value.into()),
            embedding: ValueEmbedding::String,
        }
    }

    pub fn uri(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            value: Some(value.into()),
            embedding: ValueEmbedding::Uri,
        }
    }

    pub fn base64(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            value: Some(value.into()),
            embedding: ValueEmbedding::Base64,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            value: None,
            embedding: ValueEmbedding::String,
        }
    }

    pub fn composite(name: impl Into<String>, items: Vec<ContextNode>) -> Self {
        Self::Composite {
            name: name.into(),
            items,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::Composite { name, .. } => name,
        }
    }
}

/// Wire shape of a context node: composites are typed `map` or `list`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    embedding_method: Option<ValueEmbedding>,
    #[serde(default)]
    item: Vec<RawContent>,
}

impl From<RawContent> for ContextNode {
    fn from(raw: RawContent) -> Self {
        let name = raw.name.unwrap_or_default();
        match raw.kind.as_deref() {
            Some("map") | Some("list") => Self::Composite {
                name,
                items: raw.item.into_iter().map(Self::from).collect(),
            },
            _ => Self::Scalar {
                name,
                value: raw.value,
                embedding: raw.embedding_method.unwrap_or_default(),
            },
        }
    }
}

/// A validation result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tar {
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    pub result: TestResult,
    #[serde(default)]
    pub counters: Option<Counters>,
    #[serde(default)]
    pub context: Option<ContextNode>,
    #[serde(default)]
    pub reports: Vec<Finding>,
}

impl Tar {
    pub fn new(result: TestResult) -> Self {
        Self {
            date: None,
            result,
            counters: None,
            context: None,
            reports: Vec::new(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, TarError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, TarError> {
        Ok(serde_yml::from_str(content)?)
    }

    /// Load a result file, picking the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self, TarError> {
        let content = std::fs::read_to_string(path).map_err(|source| TarError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Err(TarError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Counts computed from the findings, in order of appearance.
    pub fn computed_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for finding in &self.reports {
            counts.record(finding.level);
        }
        counts
    }

    /// Explicit counters when all three are present, otherwise the computed counts.
    pub fn resolved_counts(&self) -> SeverityCounts {
        self.counters
            .as_ref()
            .and_then(Counters::explicit)
            .unwrap_or_else(|| self.computed_counts())
    }
}
