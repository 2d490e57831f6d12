use crate::core::gateway::{BackendForwarder, FrontGateway};
use crate::core::resolver::WeatherResolutionService;
use crate::core::trace::{ScopedSpan, TraceContext};
use crate::domain::model::CepRequest;
use crate::domain::ports::{LocationLookup, WeatherLookup};
use crate::utils::error::PipelineError;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use opentelemetry::trace::SpanKind;
use std::sync::Arc;

/// 手動解析本體：任何格式錯誤一律回 422，而不是 axum 預設的 400/413/415
fn parse_request(body: Result<Bytes, BytesRejection>) -> Result<CepRequest, PipelineError> {
    let body = body.map_err(|e| PipelineError::invalid_input(format!("unreadable request body: {}", e)))?;
    serde_json::from_slice(&body)
        .map_err(|e| PipelineError::invalid_input(format!("malformed request body: {}", e)))
}

fn fail(route: &'static str, span: &ScopedSpan, err: PipelineError) -> Response {
    let trace_id = span.trace_id();
    if err.status_code() >= 500 {
        tracing::error!(route, trace_id = %trace_id, status = err.status_code(), "❌ {}", err);
    } else {
        tracing::warn!(route, trace_id = %trace_id, status = err.status_code(), "⚠️ {}", err);
    }
    span.record_error(&err);
    span.record_status(err.status_code());
    err.into_response()
}

/// `POST /cep` on the monolith and `POST /weather` on the resolver backend.
pub async fn resolve_temperature<L, W>(
    State(service): State<Arc<WeatherResolutionService<L, W>>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    L: LocationLookup + 'static,
    W: WeatherLookup + 'static,
{
    const ROUTE: &str = "resolve_temperature";

    let parent = TraceContext::from_headers(&headers);
    let span = service.telemetry().start_span(ROUTE, SpanKind::Server, &parent);

    let request = match parse_request(body) {
        Ok(request) => request,
        Err(e) => return fail(ROUTE, &span, e),
    };

    match service.resolve(&request.cep, span.context()).await {
        Ok(temperature) => {
            tracing::info!(
                route = ROUTE,
                trace_id = %span.trace_id(),
                city = %temperature.city,
                "✅ temperature resolved"
            );
            span.record_status(200);
            (StatusCode::OK, Json(temperature)).into_response()
        }
        Err(e) => fail(ROUTE, &span, e),
    }
}

/// `POST /cep` on the gateway.
pub async fn forward_to_backend<F>(
    State(gateway): State<Arc<FrontGateway<F>>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    F: BackendForwarder + 'static,
{
    const ROUTE: &str = "cep_gateway";

    let parent = TraceContext::from_headers(&headers);
    let span = gateway.telemetry().start_span(ROUTE, SpanKind::Server, &parent);

    let request = match parse_request(body) {
        Ok(request) => request,
        Err(e) => return fail(ROUTE, &span, e),
    };

    match gateway.forward(&request.cep, span.context()).await {
        Ok(forwarded) => {
            tracing::info!(
                route = ROUTE,
                trace_id = %span.trace_id(),
                status = forwarded.status,
                "↪️ backend answer relayed"
            );
            span.record_status(forwarded.status);
            forwarded.into_response()
        }
        Err(e) => fail(ROUTE, &span, e),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;

    #[test]
    fn test_parse_request_accepts_cep_field() {
        let request = parse_request(Ok(Bytes::from_static(br#"{"cep":"01001000"}"#))).unwrap();
        assert_eq!(request.cep, "01001000");
    }

    #[test]
    fn test_parse_request_rejects_malformed_bodies() {
        for body in [&b"not json"[..], b"{}", br#"{"cep":12345678}"#, b""] {
            let err = parse_request(Ok(Bytes::from_static(body))).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }
}
