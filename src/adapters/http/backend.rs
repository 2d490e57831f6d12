use super::build_client;
use crate::core::trace::TraceContext;
use crate::domain::model::{CepRequest, PostalCode};
use crate::core::gateway::{BackendForwarder, ForwardedResponse};
use crate::utils::error::{PipelineError, Result, Upstream};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Forwards `{"cep": ...}` to the resolver backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: String,
}

impl BackendClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl BackendForwarder for BackendClient {
    async fn forward(&self, cep: &PostalCode, cx: &TraceContext) -> Result<ForwardedResponse> {
        let request = CepRequest {
            cep: cep.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(cx.headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Backend, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::upstream(Upstream::Backend, e))?;

        Ok(ForwardedResponse { status, body })
    }
}
