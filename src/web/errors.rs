use crate::error::ValidatorError;
use crate::i18n::Localiser;
use chrono::{Local, NaiveDateTime};
use reqwest::StatusCode;
use serde::Serialize;

pub const MESSAGE_NOT_FOUND: &str = "The requested resource could not be found";
pub const MESSAGE_UNEXPECTED: &str = "An unexpected error occurred during validation";

/// Body returned to API clients when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub timestamp: NaiveDateTime,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorInfo,
}

impl ErrorResponse {
    /// Map an error raised while serving a request to its HTTP response, logging it.
    ///
    /// Only [`ValidatorError::Display`] messages reach the client; anything else
    /// gets a generic message.
    pub fn from_error(error: &(dyn std::error::Error + 'static), localiser: &Localiser) -> Self {
        match error.downcast_ref::<ValidatorError>() {
            Some(ValidatorError::NotFound { requested_domain }) => {
                match requested_domain {
                    Some(domain) => tracing::warn!("Resource not found for domain [{domain}]"),
                    None => tracing::warn!("Resource not found"),
                }
                Self::new(StatusCode::NOT_FOUND, MESSAGE_NOT_FOUND)
            }
            Some(err @ ValidatorError::Display { .. }) => {
                tracing::error!("{}", err.message_for_log());
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.message_for_display(localiser))
            }
            _ => {
                tracing::error!("Unexpected error during validation: {error}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, MESSAGE_UNEXPECTED)
            }
        }
    }

    pub fn from_anyhow(error: &anyhow::Error, localiser: &Localiser) -> Self {
        let error: &(dyn std::error::Error + 'static) = error.as_ref();
        Self::from_error(error, localiser)
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorInfo::new(message),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}
