use crate::tar::TestResult;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

pub const VALIDATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Surface through which a validation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Api {
    Web,
    WebMinimal,
    Soap,
    Rest,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageResult {
    Success,
    Warning,
    Failure,
}

impl From<TestResult> for UsageResult {
    fn from(result: TestResult) -> Self {
        match result {
            TestResult::Success => Self::Success,
            TestResult::Warning => Self::Warning,
            TestResult::Failure => Self::Failure,
        }
    }
}

/// One anonymous usage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageData {
    pub validator: String,
    pub domain: String,
    pub api: Api,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,
    pub result: UsageResult,
    #[serde(serialize_with = "serialize_validation_time")]
    pub validation_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_blank")]
    pub country: Option<String>,
}

impl UsageData {
    pub fn new(
        validator: impl Into<String>,
        domain: impl Into<String>,
        api: Api,
        validation_type: Option<&str>,
        result: UsageResult,
    ) -> Self {
        Self {
            validator: validator.into(),
            domain: domain.into(),
            api,
            validation_type: validation_type.map(str::to_string),
            result,
            validation_time: Utc::now(),
            country: None,
        }
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn serialize_validation_time<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(VALIDATION_TIME_FORMAT))
}

/// Payload posted to the statistics endpoint, optionally carrying the shared secret.
#[derive(Debug, Serialize)]
pub(crate) struct SignedUsageData<'a> {
    #[serde(flatten)]
    pub data: &'a UsageData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<&'a str>,
}
