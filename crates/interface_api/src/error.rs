//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use core_kernel::PortError;
use domain_integration::{IntegrationError, NormalizedError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Failed upstream call, relayed with the upstream status
    #[error("Upstream error {}", .0.http_status)]
    Upstream(NormalizedError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Upstream(normalized) => {
                let status =
                    StatusCode::from_u16(normalized.http_status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = json!({
                    "origin": normalized.origin,
                    "status": normalized.http_status,
                    "body": normalized.body,
                });
                return (status, Json(body)).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", msg.clone()),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<IntegrationError> for ApiError {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::Upstream(normalized) => ApiError::Upstream(normalized),
            IntegrationError::Configuration { message } => ApiError::Configuration(message),
            decode @ IntegrationError::Decode { .. } => ApiError::BadGateway(decode.to_string()),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_keeps_upstream_status() {
        let response = ApiError::Upstream(NormalizedError::new(409, json!("conflito"))).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_integration_error_mapping() {
        let configuration: ApiError = IntegrationError::configuration("apiToken missing").into();
        assert!(matches!(configuration, ApiError::Configuration(_)));

        let decode: ApiError = IntegrationError::decode("list_units", "bad shape").into();
        assert_eq!(decode.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
