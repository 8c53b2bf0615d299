use super::geo::CountryDatabase;
use super::usage::{Api, UsageData, UsageResult};
use super::webhook::WebHook;
use crate::config::AppConfig;
use crate::error::ValidatorError;
use crate::web::RequestInfo;
use std::path::Path;
use tokio::task::JoinHandle;

/// Builds usage records for completed validations and hands them to the webhook.
#[derive(Debug)]
pub struct StatisticReporting {
    validator: String,
    webhook: WebHook,
    ip_header: String,
    countries: Option<CountryDatabase>,
}

impl StatisticReporting {
    /// `None` when no statistics endpoint is configured.
    ///
    /// A country database that cannot be loaded disables country detection
    /// but not reporting itself.
    pub fn new(config: &AppConfig) -> Result<Option<Self>, ValidatorError> {
        let Some(webhook) = WebHook::from_config(&config.webhook)? else {
            return Ok(None);
        };
        let countries = if config.webhook.statistics_enable_country_detection {
            Self::open_country_database(Path::new(&config.webhook.statistics_country_detection_db_file))
        } else {
            None
        };
        Ok(Some(Self {
            validator: config.identifier.clone(),
            webhook,
            ip_header: config.webhook.ip_header.clone(),
            countries,
        }))
    }

    fn open_country_database(path: &Path) -> Option<CountryDatabase> {
        match CountryDatabase::open(path) {
            Ok(db) => {
                tracing::info!("Country detection enabled with {}", db.describe());
                Some(db)
            }
            Err(e) => {
                tracing::warn!("Country detection disabled: {e}");
                None
            }
        }
    }

    pub fn with_country_database(mut self, countries: CountryDatabase) -> Self {
        self.countries = Some(countries);
        self
    }

    pub fn country_detection_enabled(&self) -> bool {
        self.countries.is_some()
    }

    pub fn webhook(&self) -> &WebHook {
        &self.webhook
    }

    /// Client address from the configured header, else the peer address.
    pub fn extract_ip_address(&self, request: &RequestInfo) -> Option<String> {
        request
            .header(&self.ip_header)
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or(request.remote_addr.as_deref())
            .map(str::to_string)
    }

    /// ISO country code for `ip`, `None` when detection is off or the lookup fails.
    pub fn country_iso(&self, ip: &str) -> Option<String> {
        let countries = self.countries.as_ref()?;
        match countries.country_for(ip) {
            Ok(Some(code)) => Some(code.to_string()),
            Ok(None) => {
                tracing::debug!("No country found for address [{ip}]");
                None
            }
            Err(e) => {
                tracing::warn!("Error during the extraction of the country from the IP address: {e}");
                None
            }
        }
    }

    pub fn usage_data(
        &self,
        domain: &str,
        api: Api,
        validation_type: Option<&str>,
        result: impl Into<UsageResult>,
        ip: Option<&str>,
    ) -> UsageData {
        let country = ip.and_then(|ip| self.country_iso(ip));
        UsageData::new(&self.validator, domain, api, validation_type, result.into()).with_country(country)
    }

    /// Send in the background. Must be called from within a tokio runtime.
    pub fn send_usage_data(
        &self,
        domain: &str,
        api: Api,
        validation_type: Option<&str>,
        result: impl Into<UsageResult>,
        ip: Option<&str>,
    ) -> JoinHandle<()> {
        let data = self.usage_data(domain, api, validation_type, result, ip);
        self.webhook.send_usage_data(data)
    }
}
