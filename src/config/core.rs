use super::formats::FileProvider;
use crate::error::ValidatorError;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "VALIDATOR_";

/// Settings shared by every validation domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub identifier: String,
    pub resource_root: PathBuf,
    pub tmp_folder: PathBuf,
    pub log_folder: PathBuf,
    /// Domain folders to load; every folder under `resource_root` when empty.
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Usage statistics settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Statistics endpoint; reporting is off when empty.
    pub statistics: String,
    pub statistics_secret: String,
    pub statistics_enable_country_detection: bool,
    pub statistics_country_detection_db_file: String,
    pub ip_header: String,
}

impl WebhookConfig {
    pub fn statistics_url(&self) -> Option<&str> {
        non_blank(&self.statistics)
    }

    pub fn secret(&self) -> Option<&str> {
        non_blank(&self.statistics_secret)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl AppConfig {
    pub fn load() -> Result<Self, ValidatorError> {
        Self::load_with_custom_config(None)
    }

    /// Defaults, then either `custom_config` or `validator.{toml,json,yaml,yml}` in the
    /// working directory, then `VALIDATOR_*` variables (`__` separates nested keys).
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self, ValidatorError> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                return Err(ValidatorError::Config(format!(
                    "configuration file {} not found",
                    custom_path.display()
                )));
            }
            tracing::debug!("Loading configuration from {}", custom_path.display());
            figment = figment.merge(FileProvider::new(custom_path));
        } else if let Some(repo_config) = super::find_config_file(Path::new("."), "validator") {
            tracing::debug!("Loading configuration from {}", repo_config.display());
            figment = figment.merge(FileProvider::new(repo_config));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self, ValidatorError> {
        figment
            .extract()
            .map_err(|e| ValidatorError::Config(e.to_string()))
    }
}
