use super::{AppConfig, ConfigFormat};

#[test]
fn test_config_loads_defaults() {
    let config = AppConfig::load().expect("Should load default config");

    // Values from default-config.toml
    assert_eq!(config.identifier, "validator");
    assert_eq!(config.resource_root.to_str(), Some("resources/domains"));
    assert!(config.domains.is_empty());
    assert_eq!(config.webhook.statistics_url(), None);
    assert!(!config.webhook.statistics_enable_country_detection);
    assert_eq!(config.webhook.ip_header, "X-Real-IP");
}

#[test]
fn test_exported_config_loads_back() {
    let config = AppConfig::load().unwrap();
    let dir = tempfile::tempdir().unwrap();
    for format in [ConfigFormat::Toml, ConfigFormat::Json, ConfigFormat::Yaml] {
        let extension = match format {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        };
        let path = dir.path().join(format!("exported.{extension}"));
        std::fs::write(&path, format.export(&config).unwrap()).unwrap();
        let loaded = AppConfig::load_with_custom_config(Some(&path)).unwrap();
        assert_eq!(loaded, config, "{extension}");
    }
}
