use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Unparseable model content is not an error: the responder substitutes
/// fallback guidance instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(detail) => {
                tracing::error!("Configuration error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "Server configuration error".to_string(),
                )
            }
            AppError::Upstream(detail) => {
                tracing::error!("Completion service error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "OpenAI API error".to_string(),
                )
            }
            AppError::UpstreamFormat(detail) => {
                tracing::error!("Completion service envelope error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_FORMAT_ERROR",
                    "Invalid response from OpenAI".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_400_with_user_message() {
        let response = AppError::Validation("Vui lòng nhập cảm giác của bạn".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Vui lòng nhập cảm giác của bạn");
    }

    #[tokio::test]
    async fn test_configuration_detail_is_not_exposed() {
        let response =
            AppError::Configuration("OPENAI_API_KEY is not set".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Server configuration error");
    }

    #[tokio::test]
    async fn test_upstream_errors_are_502() {
        let upstream = AppError::Upstream("status 500".to_string()).into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let format = AppError::UpstreamFormat("eof".to_string()).into_response();
        assert_eq!(format.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(format).await;
        assert_eq!(json["error"]["code"], "UPSTREAM_FORMAT_ERROR");
    }

    #[tokio::test]
    async fn test_every_variant_maps_to_a_documented_code() {
        let cases = [
            (AppError::Validation("v".into()), 400, "VALIDATION_ERROR", "v"),
            (AppError::Configuration("c".into()), 500, "CONFIGURATION_ERROR", "Server configuration error"),
            (AppError::Upstream("u".into()), 502, "UPSTREAM_ERROR", "OpenAI API error"),
            (AppError::UpstreamFormat("f".into()), 502, "UPSTREAM_FORMAT_ERROR", "Invalid response from OpenAI"),
        ];

        for (error, status, code, message) in cases {
            let response = error.into_response();
            assert_eq!(response.status().as_u16(), status);
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], code);
            assert_eq!(json["error"]["message"], message);
        }
    }
}
