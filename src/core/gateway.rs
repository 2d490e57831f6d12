use crate::core::trace::{Telemetry, TraceContext};
use crate::domain::model::PostalCode;
use crate::utils::error::Result;
use crate::utils::validation::PostalCodeRule;
use async_trait::async_trait;
use axum::body::Bytes;
use opentelemetry::trace::SpanKind;

/// 後端回應，原樣轉發
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Gateway → resolver backend hop.
///
/// Any status the backend answers with is a successful forward; only transport
/// failures are errors.
#[async_trait]
pub trait BackendForwarder: Send + Sync {
    async fn forward(&self, cep: &PostalCode, cx: &TraceContext) -> Result<ForwardedResponse>;
}

/// Inbound edge of the split topology.
///
/// Checks the postal code with its own rule and forwards it. The backend's
/// answer is not interpreted here.
pub struct FrontGateway<F: BackendForwarder> {
    forwarder: F,
    rule: PostalCodeRule,
    telemetry: Telemetry,
}

impl<F: BackendForwarder> FrontGateway<F> {
    pub fn new(forwarder: F, rule: PostalCodeRule, telemetry: Telemetry) -> Self {
        Self {
            forwarder,
            rule,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub async fn forward(&self, raw_cep: &str, parent: &TraceContext) -> Result<ForwardedResponse> {
        let cep = self.rule.check(raw_cep)?;

        let span = self
            .telemetry
            .start_span("forward_to_backend", SpanKind::Client, parent);
        span.set_attribute("cep", cep.to_string());

        let response = self
            .forwarder
            .forward(&cep, span.context())
            .await
            .inspect_err(|e| span.record_error(e))?;

        span.record_status(response.status);
        tracing::debug!(cep = %cep, status = response.status, "backend answered");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ErrorKind, PipelineError, Upstream};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockForwarder {
        response: std::result::Result<ForwardedResponse, PipelineError>,
        forwarded: Arc<Mutex<Vec<(String, Option<String>)>>>,
    }

    impl MockForwarder {
        fn answering(status: u16, body: &'static str) -> Self {
            Self {
                response: Ok(ForwardedResponse {
                    status,
                    body: Bytes::from_static(body.as_bytes()),
                }),
                forwarded: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: Err(PipelineError::upstream(Upstream::Backend, "connection refused")),
                forwarded: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl BackendForwarder for MockForwarder {
        async fn forward(&self, cep: &PostalCode, cx: &TraceContext) -> Result<ForwardedResponse> {
            self.forwarded
                .lock()
                .await
                .push((cep.to_string(), cx.trace_id()));
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_forwards_valid_code_and_relays_answer() {
        let forwarder = MockForwarder::answering(404, r#"{"message":"can not find zipcode"}"#);
        let gateway = FrontGateway::new(forwarder.clone(), PostalCodeRule::Strict, Telemetry::disabled());

        let response = gateway.forward("99999999", &TraceContext::root()).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(&response.body[..], br#"{"message":"can not find zipcode"}"#);
        let forwarded = forwarder.forwarded.lock().await;
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].0, "99999999");
        // 轉發時帶著 forward span 的 context
        assert!(forwarded[0].1.is_some());
    }

    #[tokio::test]
    async fn test_invalid_code_is_not_forwarded() {
        let forwarder = MockForwarder::answering(200, "{}");
        let gateway = FrontGateway::new(forwarder.clone(), PostalCodeRule::Strict, Telemetry::disabled());

        let err = gateway.forward("123", &TraceContext::root()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(forwarder.forwarded.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_length_only_rule_forwards_non_digits() {
        let forwarder = MockForwarder::answering(422, r#"{"message":"invalid zipcode"}"#);
        let gateway = FrontGateway::new(forwarder.clone(), PostalCodeRule::LengthOnly, Telemetry::disabled());

        let response = gateway.forward("abcdefgh", &TraceContext::root()).await.unwrap();

        assert_eq!(response.status, 422);
        assert_eq!(forwarder.forwarded.lock().await[0].0, "abcdefgh");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_upstream_failure() {
        let gateway = FrontGateway::new(MockForwarder::unreachable(), PostalCodeRule::Strict, Telemetry::disabled());

        let err = gateway.forward("01001000", &TraceContext::root()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(err.user_friendly_message(), "failed to connect to resolver backend");
    }
}
