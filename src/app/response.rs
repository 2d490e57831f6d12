use crate::domain::model::ErrorBody;
use crate::core::gateway::ForwardedResponse;
use crate::utils::error::PipelineError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, self.user_friendly_message())
    }
}

/// Relays the backend answer as-is; only the content type is (re)asserted.
impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = (status, self.body).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Upstream;
    use axum::body::{to_bytes, Bytes};

    async fn body_of(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_error_becomes_json_message() {
        let response = PipelineError::LocationNotFound {
            cep: "99999999".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(&body_of(response).await[..], br#"{"message":"can not find zipcode"}"#);
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_exposed() {
        let response = PipelineError::upstream(Upstream::Directory, "dns error: no such host").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert!(!String::from_utf8_lossy(&body).contains("dns"));
    }

    #[tokio::test]
    async fn test_forwarded_response_is_relayed_byte_for_byte() {
        let raw = Bytes::from_static(br#"{"city":"Recife","temp_C":30.0,"temp_F":86.0,"temp_K":303.0}"#);
        let response = ForwardedResponse {
            status: 200,
            body: raw.clone(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_of(response).await, raw);
    }
}
