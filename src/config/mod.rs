//! Configuration for validators.
//!
//! Application settings come from the embedded `default-config.toml`, an
//! optional custom file and `VALIDATOR_*` environment variables, layered with
//! figment. Each validation domain lives in its own folder under the
//! resource root with a `config.{toml,yaml,yml,json}` file.

pub mod core;
pub mod domain;
pub mod formats;

#[cfg(test)]
mod tests;

pub use self::core::{AppConfig, ENV_PREFIX, WebhookConfig};
pub use domain::{DomainConfig, DomainConfigCache, ValidatorChannel};
pub use formats::{ConfigFormat, FileProvider, find_config_file};
