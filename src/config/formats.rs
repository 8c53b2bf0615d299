use figment::providers::{Data, Format, Json, Toml, Yaml};
use figment::value::{Dict, Map};
use figment::{Error, Metadata, Profile, Provider};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub const EXTENSIONS: [&'static str; 4] = ["toml", "yaml", "yml", "json"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Serialize `value` in this format.
    pub fn export<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        let output = match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
            Self::Yaml => serde_yml::to_string(value)?,
        };
        Ok(output)
    }
}

/// A figment provider reading a file in the format given by its extension.
/// Files without a known extension are read as TOML.
pub enum FileProvider {
    Toml(Data<Toml>),
    Json(Data<Json>),
    Yaml(Data<Yaml>),
}

impl FileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Json) => Self::Json(Json::file(path)),
            Some(ConfigFormat::Yaml) => Self::Yaml(Yaml::file(path)),
            Some(ConfigFormat::Toml) | None => Self::Toml(Toml::file(path)),
        }
    }
}

impl Provider for FileProvider {
    fn metadata(&self) -> Metadata {
        match self {
            Self::Toml(p) => p.metadata(),
            Self::Json(p) => p.metadata(),
            Self::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        match self {
            Self::Toml(p) => p.data(),
            Self::Json(p) => p.data(),
            Self::Yaml(p) => p.data(),
        }
    }
}

/// First existing `<dir>/<stem>.<ext>` over the supported extensions.
pub fn find_config_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    ConfigFormat::EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/config.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("config.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("config")), None);
    }

    #[test]
    fn test_find_config_file_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        assert_eq!(find_config_file(dir.path(), "config"), Some(dir.path().join("config.json")));
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        assert_eq!(find_config_file(dir.path(), "config"), Some(dir.path().join("config.toml")));
        assert_eq!(find_config_file(dir.path(), "other"), None);
    }

    #[test]
    fn test_export() {
        let value = serde_json::json!({ "identifier": "validator" });
        assert!(ConfigFormat::Toml.export(&value).unwrap().contains("identifier = \"validator\""));
        assert!(ConfigFormat::Yaml.export(&value).unwrap().contains("identifier: validator"));
        assert!(ConfigFormat::Json.export(&value).unwrap().contains("\"identifier\": \"validator\""));
    }
}
