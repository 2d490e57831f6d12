use crate::app::handlers::{forward_to_backend, health, resolve_temperature};
use crate::app::response::method_not_allowed;
use crate::core::gateway::{BackendForwarder, FrontGateway};
use crate::core::resolver::{ResolverBackend, WeatherResolutionService};
use crate::domain::ports::{LocationLookup, WeatherLookup};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub const CEP_PATH: &str = "/cep";
pub const WEATHER_PATH: &str = "/weather";
pub const HEALTH_PATH: &str = "/health";

/// Single-process topology: `POST /cep` resolves everything in-process.
pub fn monolith_router<L, W>(service: WeatherResolutionService<L, W>) -> Router
where
    L: LocationLookup + 'static,
    W: WeatherLookup + 'static,
{
    resolver_router(CEP_PATH, service)
}

/// Compute edge of the split topology: `POST /weather`.
pub fn backend_router<L, W>(service: ResolverBackend<L, W>) -> Router
where
    L: LocationLookup + 'static,
    W: WeatherLookup + 'static,
{
    resolver_router(WEATHER_PATH, service)
}

fn resolver_router<L, W>(path: &str, service: WeatherResolutionService<L, W>) -> Router
where
    L: LocationLookup + 'static,
    W: WeatherLookup + 'static,
{
    Router::new()
        .route(
            path,
            post(resolve_temperature::<L, W>).fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health))
        .with_state(Arc::new(service))
}

/// Inbound edge of the split topology: `POST /cep`, forwarded to the backend.
pub fn gateway_router<F>(gateway: FrontGateway<F>) -> Router
where
    F: BackendForwarder + 'static,
{
    Router::new()
        .route(
            CEP_PATH,
            post(forward_to_backend::<F>).fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health))
        .with_state(Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trace::{Telemetry, TraceContext};
    use crate::domain::model::PostalCode;
    use crate::core::gateway::ForwardedResponse;
    use crate::utils::error::Result;
    use crate::utils::validation::PostalCodeRule;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body, Bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct EchoForwarder;

    #[async_trait]
    impl BackendForwarder for EchoForwarder {
        async fn forward(&self, cep: &PostalCode, _cx: &TraceContext) -> Result<ForwardedResponse> {
            Ok(ForwardedResponse {
                status: 200,
                body: Bytes::from(format!(r#"{{"cep":"{}"}}"#, cep)),
            })
        }
    }

    fn router() -> Router {
        gateway_router(FrontGateway::new(
            EchoForwarder,
            PostalCodeRule::Strict,
            Telemetry::disabled(),
        ))
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let request = Request::get(HEALTH_PATH).body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_on_cep_is_method_not_allowed() {
        let request = Request::put(CEP_PATH).body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"method not allowed"}"#);
    }

    #[tokio::test]
    async fn test_post_on_cep_is_forwarded() {
        let request = Request::post(CEP_PATH)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"cep":"01001000"}"#))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"cep":"01001000"}"#);
    }

    #[tokio::test]
    async fn test_oversized_body_on_gateway_is_invalid_input() {
        let body = format!(r#"{{"cep":"{}"}}"#, "1".repeat(3_000_000));
        let request = Request::post(CEP_PATH)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"invalid zipcode"}"#);
    }
}
