//! Error types shared by the validator surfaces.

use crate::i18n::Localiser;
use thiserror::Error;

/// Message key used when an error carries no more specific key.
pub const MESSAGE_DEFAULT: &str = "validator.label.exception.default";

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("No validation domains could be found.")]
    NoDomains,

    #[error(
        "A specific validation domain needs to be selected. Do this by supplying the --domain argument. Possible values for this are [{}].",
        .choices.join("|")
    )]
    DomainSelectionRequired { choices: Vec<String> },

    #[error(
        "The requested validation domain [{name}] is not defined. Possible values for this are [{}].",
        .choices.join("|")
    )]
    UnknownDomain { name: String, choices: Vec<String> },

    #[error("The requested resource could not be found")]
    NotFound { requested_domain: Option<String> },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An error meant to be shown to users, identified by a localisation key.
    #[error("{key}")]
    Display {
        key: String,
        params: Vec<String>,
        #[source]
        source: Option<BoxError>,
    },
}

impl ValidatorError {
    pub fn display(key: impl Into<String>) -> Self {
        Self::Display {
            key: key.into(),
            params: Vec::new(),
            source: None,
        }
    }

    pub fn display_with_source(
        key: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Display {
            key: key.into(),
            params: Vec::new(),
            source: Some(source.into()),
        }
    }

    pub fn not_found(requested_domain: impl Into<String>) -> Self {
        Self::NotFound {
            requested_domain: Some(requested_domain.into()),
        }
    }

    /// Message shown to the user, localised with the provided catalogue.
    pub fn message_for_display(&self, localiser: &Localiser) -> String {
        match self {
            Self::Display { key, params, .. } => localiser.localise_with(key, params.as_slice()),
            other => other.to_string(),
        }
    }

    /// Message written to the log, always in the default language.
    pub fn message_for_log(&self) -> String {
        match Localiser::english() {
            Ok(localiser) => self.message_for_display(&localiser),
            Err(_) => self.to_string(),
        }
    }
}
