use super::build_client;
use crate::core::trace::TraceContext;
use crate::domain::model::Locality;
use crate::domain::ports::WeatherLookup;
use crate::utils::error::{PipelineError, Result, Upstream};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct WeatherApiResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: Option<f64>,
}

/// WeatherAPI-compatible current-conditions client.
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    endpoint: String,
    api_key: SecretString,
}

impl WeatherApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: SecretString, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl WeatherLookup for WeatherApiClient {
    async fn current_celsius(&self, locality: &Locality, cx: &TraceContext) -> Result<f64> {
        tracing::debug!("📡 Weather lookup for '{}'", locality);

        // reqwest 會對查詢參數做 URL 編碼（空白、重音字元）
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.expose_secret()), ("q", locality.as_str())])
            .headers(cx.headers())
            .send()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Weather, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::upstream(
                Upstream::Weather,
                format!("weather service answered {}", status),
            ));
        }

        let payload: WeatherApiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Weather, e.without_url()))?;

        payload
            .current
            .and_then(|c| c.temp_c)
            .ok_or_else(|| PipelineError::upstream(Upstream::Weather, "response has no current.temp_c"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> WeatherApiClient {
        WeatherApiClient::new(
            server.url("/v1/current.json"),
            SecretString::from("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn locality(name: &str) -> Locality {
        Locality::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_current_celsius_sends_key_and_encoded_locality() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/current.json")
                .query_param("key", "test-key")
                .query_param("q", "São Paulo");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "location": {"name": "Sao Paulo"},
                    "current": {"temp_c": 25.0, "temp_f": 77.0}
                }));
        });

        let celsius = client_for(&server)
            .current_celsius(&locality("São Paulo"), &TraceContext::root())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(celsius, 25.0);
    }

    #[tokio::test]
    async fn test_integer_temperature_is_accepted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(200).json_body(serde_json::json!({"current": {"temp_c": 18}}));
        });

        let celsius = client_for(&server)
            .current_celsius(&locality("Curitiba"), &TraceContext::root())
            .await
            .unwrap();

        assert_eq!(celsius, 18.0);
    }

    #[tokio::test]
    async fn test_missing_temperature_is_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(200).json_body(serde_json::json!({"current": {}}));
        });

        let err = client_for(&server)
            .current_celsius(&locality("Curitiba"), &TraceContext::root())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(400).json_body(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            }));
        });

        let err = client_for(&server)
            .current_celsius(&locality("Atlantis"), &TraceContext::root())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(err.user_friendly_message(), "failed to fetch temperature");
    }

    #[tokio::test]
    async fn test_error_detail_does_not_leak_api_key() {
        // 連不上的埠：取得一個埠後立即釋放
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = WeatherApiClient::new(
            format!("http://127.0.0.1:{}/v1/current.json", port),
            SecretString::from("super-secret".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = client
            .current_celsius(&locality("Recife"), &TraceContext::root())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert!(!err.to_string().contains("super-secret"));
    }
}
