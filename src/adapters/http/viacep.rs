use super::build_client;
use crate::core::trace::TraceContext;
use crate::domain::model::{Locality, PostalCode};
use crate::domain::ports::LocationLookup;
use crate::utils::error::{PipelineError, Result, Upstream};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const CEP_PLACEHOLDER: &str = "{cep}";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// ViaCEP-compatible directory client.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    url_template: String,
}

impl ViaCepClient {
    /// `url_template` must contain `{cep}`, e.g. `https://viacep.com.br/ws/{cep}/json/`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url_template: url_template.into(),
        })
    }

    fn build_endpoint(&self, cep: &PostalCode) -> String {
        self.url_template.replace(CEP_PLACEHOLDER, cep.as_str())
    }
}

#[async_trait]
impl LocationLookup for ViaCepClient {
    async fn lookup(&self, cep: &PostalCode, cx: &TraceContext) -> Result<Locality> {
        let endpoint = self.build_endpoint(cep);
        tracing::debug!("📡 Directory lookup: {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .headers(cx.headers())
            .send()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Directory, e))?;

        let status = response.status();
        // 限流與 5xx 屬於目錄服務本身的問題，不代表郵遞區號不存在
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::upstream(
                Upstream::Directory,
                format!("directory answered {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Directory, e))?;

        // 非 JSON、erro=true 或空白 localidade 都視為查無此郵遞區號
        let parsed: Option<ViaCepResponse> = serde_json::from_slice(&body)
            .inspect_err(|e| tracing::debug!(status = %status, "directory body not usable: {}", e))
            .ok();

        parsed
            .filter(|r| !is_error_flag(r.erro.as_ref()))
            .and_then(|r| r.localidade)
            .and_then(Locality::new)
            .ok_or_else(|| PipelineError::LocationNotFound {
                cep: cep.to_string(),
            })
    }
}

fn is_error_flag(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::String(flag)) => flag == "true",
        _ => false,
    }
}
