use super::usage::{SignedUsageData, UsageData};
use crate::config::WebhookConfig;
use crate::error::ValidatorError;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Posts usage statistics to the configured endpoint.
#[derive(Debug, Clone)]
pub struct WebHook {
    client: Client,
    url: Url,
    secret: Option<String>,
}

impl WebHook {
    /// `None` when no statistics endpoint is configured.
    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>, ValidatorError> {
        match config.statistics_url() {
            Some(url) => Self::new(url, config.secret()).map(Some),
            None => Ok(None),
        }
    }

    pub fn new(url: &str, secret: Option<&str>) -> Result<Self, ValidatorError> {
        let url = Url::parse(url).map_err(|_| {
            ValidatorError::Config(format!(
                "The following URL for the usage statistics service is not valid: {url}"
            ))
        })?;
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                ValidatorError::Config(format!("Unable to create the usage statistics HTTP client: {e}"))
            })?;
        tracing::info!("Statistics reporting is active and set to post data to [{url}]");
        Ok(Self {
            client,
            url,
            secret: secret.map(str::to_string),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Post `data` on a background task. Failures are logged and dropped.
    ///
    /// Must be called from within a tokio runtime. The handle may be ignored.
    pub fn send_usage_data(&self, data: UsageData) -> JoinHandle<()> {
        let webhook = self.clone();
        tokio::spawn(async move { webhook.post_usage_data(&data).await })
    }

    /// Post `data` and wait for the response. Failures are logged and dropped.
    pub async fn post_usage_data(&self, data: &UsageData) {
        let payload = SignedUsageData {
            data,
            secret: self.secret.as_deref(),
        };
        if let Ok(json) = serde_json::to_string(&payload) {
            tracing::debug!("Sending usage data:\n {json}");
        }

        let mut request = self.client.post(self.url.clone()).json(&payload);
        if let Some(secret) = &self.secret {
            request = request.query(&[("secret", secret)]);
        }
        match request.send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!("Statistics reporting received response {status} and message {body}");
            }
            Err(e) => tracing::warn!("Error during statistics reporting: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_url() {
        assert!(WebHook::from_config(&WebhookConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_url_is_a_configuration_error() {
        let config = WebhookConfig {
            statistics: "not a url".into(),
            ..Default::default()
        };
        let err = WebHook::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_valid_url() {
        let config = WebhookConfig {
            statistics: "https://stats.example.com/usage".into(),
            statistics_secret: "s".into(),
            ..Default::default()
        };
        let webhook = WebHook::from_config(&config).unwrap().unwrap();
        assert_eq!(webhook.url().host_str(), Some("stats.example.com"));
        assert_eq!(webhook.secret.as_deref(), Some("s"));
    }
}
