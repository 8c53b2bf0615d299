//! Per-domain configuration and the cache of all configured domains.

use super::core::{AppConfig, ENV_PREFIX};
use super::formats::{FileProvider, find_config_file};
use crate::error::ValidatorError;
use crate::i18n::Localiser;
use figment::Figment;
use figment::providers::Env;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Ways a domain can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorChannel {
    Form,
    Email,
    RestApi,
    SoapApi,
}

impl ValidatorChannel {
    pub const ALL: [ValidatorChannel; 4] = [Self::Form, Self::Email, Self::RestApi, Self::SoapApi];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Email => "email",
            Self::RestApi => "rest_api",
            Self::SoapApi => "soap_api",
        }
    }
}

impl fmt::Display for ValidatorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a domain's `config.{toml,yaml,yml,json}` file.
#[derive(Debug, Deserialize)]
struct DomainFile {
    domain_name: Option<String>,
    domain_alias: Option<String>,
    #[serde(default)]
    validation_types: Vec<String>,
    default_type: Option<String>,
    channels: Option<BTreeSet<ValidatorChannel>>,
    #[serde(default)]
    support_minimal_user_interface: bool,
    #[serde(default)]
    support_user_interface_embedding: bool,
    #[serde(default)]
    rich_text_reports: bool,
    report_title: Option<String>,
    #[serde(default)]
    add_bom_to_csv_exports: bool,
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainConfig {
    /// Folder name under the resource root.
    pub domain: String,
    /// Public name used in URLs and on the command line.
    pub domain_name: String,
    pub domain_alias: Option<String>,
    pub domain_root: PathBuf,
    pub validation_types: Vec<String>,
    pub default_type: Option<String>,
    pub channels: BTreeSet<ValidatorChannel>,
    pub support_minimal_user_interface: bool,
    pub support_user_interface_embedding: bool,
    pub rich_text_reports: bool,
    pub report_title: Option<String>,
    /// Prefix CSV reports with a UTF-8 byte order mark.
    pub add_bom_to_csv_exports: bool,
    pub labels: HashMap<String, String>,
}

impl DomainConfig {
    /// A domain with a single validation type and every channel.
    pub fn new(domain: impl Into<String>, validation_types: Vec<String>) -> Self {
        let domain = domain.into();
        let default_type = (validation_types.len() == 1).then(|| validation_types[0].clone());
        Self {
            domain_name: domain.clone(),
            domain_root: PathBuf::from(&domain),
            domain,
            domain_alias: None,
            validation_types,
            default_type,
            channels: ValidatorChannel::ALL.into_iter().collect(),
            support_minimal_user_interface: false,
            support_user_interface_embedding: false,
            rich_text_reports: false,
            report_title: None,
            add_bom_to_csv_exports: false,
            labels: HashMap::new(),
        }
    }

    /// Load the domain in `resource_root/domain`. Folders without a config file are not domains.
    pub fn load(resource_root: &Path, domain: &str) -> Result<Option<Self>, ValidatorError> {
        let domain_root = resource_root.join(domain);
        let Some(file) = find_config_file(&domain_root, "config") else {
            tracing::debug!("No configuration found for domain folder [{domain}]");
            return Ok(None);
        };

        let env_prefix = format!("{ENV_PREFIX}DOMAIN_{}_", domain.to_uppercase().replace('-', "_"));
        let raw: DomainFile = Figment::new()
            .merge(FileProvider::new(&file))
            .merge(Env::prefixed(&env_prefix))
            .extract()
            .map_err(|e| ValidatorError::Config(format!("domain [{domain}]: {e}")))?;

        let validation_types: Vec<String> = raw
            .validation_types
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if validation_types.is_empty() {
            return Err(ValidatorError::Config(format!(
                "domain [{domain}]: no validation types were configured"
            )));
        }

        let default_type = match raw.default_type.filter(|t| !t.trim().is_empty()) {
            Some(t) if validation_types.contains(&t) => Some(t),
            Some(t) => {
                tracing::warn!(
                    "Invalid configuration for domain [{domain}]. Default type [{t}] is not a validation type."
                );
                None
            }
            None => None,
        };
        let default_type = default_type.or_else(|| {
            (validation_types.len() == 1).then(|| {
                tracing::info!(
                    "Setting default validation type for domain [{domain}] to only validation type provided [{}].",
                    validation_types[0]
                );
                validation_types[0].clone()
            })
        });

        Ok(Some(Self {
            domain: domain.to_string(),
            domain_name: raw.domain_name.unwrap_or_else(|| domain.to_string()),
            domain_alias: raw.domain_alias.filter(|a| !a.trim().is_empty()),
            domain_root,
            validation_types,
            default_type,
            channels: raw
                .channels
                .unwrap_or_else(|| ValidatorChannel::ALL.into_iter().collect()),
            support_minimal_user_interface: raw.support_minimal_user_interface,
            support_user_interface_embedding: raw.support_user_interface_embedding,
            rich_text_reports: raw.rich_text_reports,
            report_title: raw.report_title,
            add_bom_to_csv_exports: raw.add_bom_to_csv_exports,
            labels: raw.labels,
        }))
    }

    pub fn has_channel(&self, channel: ValidatorChannel) -> bool {
        self.channels.contains(&channel)
    }

    pub fn has_multiple_validation_types(&self) -> bool {
        self.validation_types.len() > 1
    }

    /// Message catalogue with this domain's label overrides.
    pub fn localiser(&self) -> Result<Localiser, ValidatorError> {
        let mut overrides = self.labels.clone();
        if let Some(title) = &self.report_title {
            overrides.insert("validator.reportTitle".to_string(), title.clone());
        }
        Localiser::with_overrides(&overrides)
    }
}

/// All configured domains, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct DomainConfigCache {
    configs: Vec<DomainConfig>,
}

impl DomainConfigCache {
    /// Load the domains listed in `app`, or every domain folder under its resource root.
    pub fn load(app: &AppConfig) -> Result<Self, ValidatorError> {
        let folders = if app.domains.is_empty() {
            discover_domain_folders(&app.resource_root)
        } else {
            app.domains.clone()
        };
        let mut configs = Vec::new();
        for folder in &folders {
            if let Some(config) = DomainConfig::load(&app.resource_root, folder)? {
                configs.push(config);
            }
        }
        tracing::debug!("Loaded {} domain(s) from {}", configs.len(), app.resource_root.display());
        Ok(Self::from_configs(configs))
    }

    /// Build the cache, dropping aliases that point to unknown domains.
    pub fn from_configs(mut configs: Vec<DomainConfig>) -> Self {
        let names: Vec<String> = configs.iter().map(|c| c.domain_name.clone()).collect();
        for config in &mut configs {
            if let Some(alias) = &config.domain_alias {
                if !names.contains(alias) {
                    tracing::warn!(
                        "Domain [{}] was configured as an alias for non-existent domain [{}]. Domain alias configurations will be ignored.",
                        config.domain_name,
                        alias
                    );
                    config.domain_alias = None;
                }
            }
        }
        Self { configs }
    }

    pub fn all(&self) -> &[DomainConfig] {
        &self.configs
    }

    pub fn domain_names(&self) -> Vec<String> {
        self.configs.iter().map(|c| c.domain_name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Look a domain up by public name, following aliases.
    pub fn get_for_domain_name(&self, name: &str) -> Option<&DomainConfig> {
        self.get_for_domain_name_with(name, true, true)
    }

    pub fn get_for_domain_name_with(
        &self,
        name: &str,
        warn_if_not_found: bool,
        resolve_alias: bool,
    ) -> Option<&DomainConfig> {
        let mut current = name;
        let mut visited = Vec::new();
        loop {
            let Some(config) = self.configs.iter().find(|c| c.domain_name == current) else {
                if warn_if_not_found {
                    tracing::warn!("Invalid domain name [{current}].");
                }
                return None;
            };
            match &config.domain_alias {
                Some(alias) if resolve_alias => {
                    if visited.contains(&config.domain_name.as_str()) {
                        tracing::warn!("Domain alias cycle detected for [{name}].");
                        return None;
                    }
                    visited.push(config.domain_name.as_str());
                    current = alias;
                }
                _ => return Some(config),
            }
        }
    }

    /// The domain to run with: the requested one, or the only one configured.
    pub fn select_domain(&self, requested: Option<&str>) -> Result<&DomainConfig, ValidatorError> {
        if self.configs.is_empty() {
            return Err(ValidatorError::NoDomains);
        }
        match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(name) => self
                .get_for_domain_name(name)
                .ok_or_else(|| ValidatorError::UnknownDomain {
                    name: name.to_string(),
                    choices: self.domain_names(),
                }),
            None if self.configs.len() == 1 => Ok(&self.configs[0]),
            None => Err(ValidatorError::DomainSelectionRequired {
                choices: self.domain_names(),
            }),
        }
    }
}

fn discover_domain_folders(resource_root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(resource_root) else {
        tracing::debug!("Resource root {} is not readable", resource_root.display());
        return Vec::new();
    };
    let mut folders: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    folders.sort();
    folders
}
