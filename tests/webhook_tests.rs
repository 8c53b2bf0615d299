use httpmock::prelude::*;
use std::io::Write;
use validator_commons::config::{AppConfig, WebhookConfig};
use validator_commons::tar::TestResult;
use validator_commons::telemetry::{Api, StatisticReporting, UsageData, UsageResult, WebHook};

#[tokio::test]
async fn usage_data_is_posted_with_secret() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/usage")
                .query_param("secret", "s3cret")
                .header("content-type", "application/json")
                .json_body_partial(
                    r#"{"validator":"v1","domain":"invoice","api":"rest","validationType":"ubl","result":"failure","secret":"s3cret"}"#,
                );
            then.status(200);
        })
        .await;

    let webhook = WebHook::new(&server.url("/usage"), Some("s3cret")).unwrap();
    let data = UsageData::new("v1", "invoice", Api::Rest, Some("ubl"), UsageResult::Failure);
    webhook.send_usage_data(data).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn server_errors_are_swallowed() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/usage");
            then.status(500).body("boom");
        })
        .await;

    let webhook = WebHook::new(&server.url("/usage"), None).unwrap();
    let data = UsageData::new("v1", "invoice", Api::Web, None, UsageResult::Success);
    webhook.post_usage_data(&data).await;

    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_swallowed() {
    let webhook = WebHook::new("http://127.0.0.1:1/usage", None).unwrap();
    let data = UsageData::new("v1", "invoice", Api::Email, None, UsageResult::Warning);
    let handle = webhook.send_usage_data(data);
    assert!(handle.await.is_ok());
}

#[tokio::test]
async fn statistic_reporting_adds_country() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stats")
                .json_body_partial(r#"{"validator":"stats-validator","api":"web_minimal","result":"success","country":"BE"}"#);
            then.status(204);
        })
        .await;

    let mut db = tempfile::NamedTempFile::new().unwrap();
    writeln!(db, "# start,end,country").unwrap();
    writeln!(db, "10.0.0.0,10.255.255.255,BE").unwrap();

    let app = AppConfig {
        identifier: "stats-validator".into(),
        webhook: WebhookConfig {
            statistics: server.url("/stats"),
            statistics_enable_country_detection: true,
            statistics_country_detection_db_file: db.path().display().to_string(),
            ip_header: "X-Real-IP".into(),
            ..Default::default()
        },
        ..AppConfig::load().unwrap()
    };
    let reporting = StatisticReporting::new(&app).unwrap().unwrap();
    reporting
        .send_usage_data("invoice", Api::WebMinimal, None, TestResult::Success, Some("10.1.2.3"))
        .await
        .unwrap();

    mock.assert_async().await;
}
