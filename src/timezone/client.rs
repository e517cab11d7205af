//! HTTP client for the world-time service

use reqwest::Client;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};

/// Thin wrapper over the world-time API
///
/// `GET {base_url}` lists every known timezone, `GET {base_url}/{zone}`
/// returns an object whose `datetime` field holds the current local time.
#[derive(Debug, Clone)]
pub struct WorldTimeClient {
    http: Client,
    base_url: String,
}

impl WorldTimeClient {
    /// Create a client with the configured base URL and request timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the list of timezone identifiers
    pub async fn list_timezones(&self) -> Result<Vec<String>> {
        let body = self.get_bytes(&self.base_url).await?;

        serde_json::from_slice::<Vec<String>>(&body).map_err(|e| {
            Error::Upstream(format!(
                "timezone list is not a JSON array of strings: {}",
                e
            ))
        })
    }

    /// Fetch the current datetime for a single timezone
    pub async fn fetch_datetime(&self, timezone: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, timezone);
        let body = self.get_bytes(&url).await?;

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| Error::Upstream(format!("invalid JSON from {}: {}", url, e)))?;

        value
            .get("datetime")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::Upstream(format!("no datetime field in response from {}", url)))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("{} returned {}", url, status)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client_for(server: &MockServer) -> WorldTimeClient {
        let config = UpstreamConfig {
            base_url: server.url("/api/timezone"),
            timeout_secs: 5,
            max_concurrency: 4,
        };
        WorldTimeClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_datetime() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone/Europe/London");
                then.status(200).json_body(serde_json::json!({
                    "timezone": "Europe/London",
                    "datetime": "2024-05-01T10:00:00.000000+01:00"
                }));
            })
            .await;

        let client = client_for(&server);
        let datetime = client.fetch_datetime("Europe/London").await.unwrap();

        mock.assert_async().await;
        assert_eq!(datetime, "2024-05-01T10:00:00.000000+01:00");
    }

    #[tokio::test]
    async fn test_fetch_datetime_missing_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone/Europe/Paris");
                then.status(200).json_body(serde_json::json!({ "timezone": "Europe/Paris" }));
            })
            .await;

        let err = client_for(&server)
            .fetch_datetime("Europe/Paris")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_fetch_datetime_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone/Europe/Paris");
                then.status(503);
            })
            .await;

        let err = client_for(&server)
            .fetch_datetime("Europe/Paris")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_list_timezones() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone");
                then.status(200)
                    .json_body(serde_json::json!(["Europe/London", "Asia/Tokyo"]));
            })
            .await;

        let zones = client_for(&server).list_timezones().await.unwrap();
        assert_eq!(zones, vec!["Europe/London", "Asia/Tokyo"]);
    }

    #[tokio::test]
    async fn test_list_timezones_rejects_object() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone");
                then.status(200).json_body(serde_json::json!({ "error": "nope" }));
            })
            .await;

        let err = client_for(&server).list_timezones().await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_fetch_datetime_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/timezone/Asia/Tokyo");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(serde_json::json!({ "datetime": "2024-05-01T18:00:00+09:00" }));
            })
            .await;

        let client = WorldTimeClient::new(&UpstreamConfig {
            base_url: server.url("/api/timezone"),
            timeout_secs: 1,
            max_concurrency: 1,
        })
        .unwrap();

        let err = client.fetch_datetime("Asia/Tokyo").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
    }
}
