//! Integration domain errors
//!
//! Callers of an upstream adapter receive either a typed success value or an
//! `IntegrationError`. Upstream failures are always surfaced in the uniform
//! `NormalizedError` shape, whatever the transport failure mode was.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Origin tag carried by every normalized upstream error
pub const INTEGRATION_ERROR_ORIGIN: &str = "integration-error";

/// Uniform error shape for failed upstream calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub http_status: u16,
    pub origin: String,
    /// Upstream response body, or the raw transport error when there was none
    pub body: Value,
}

impl NormalizedError {
    pub fn new(http_status: u16, body: Value) -> Self {
        Self {
            http_status,
            origin: INTEGRATION_ERROR_ORIGIN.to_string(),
            body,
        }
    }
}

/// Errors that can occur while calling an upstream integration
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Missing or invalid credentials/configuration. Fatal and never retried.
    #[error("Integration configuration error: {message}")]
    Configuration { message: String },

    /// The upstream call failed after retries
    #[error("Upstream call failed with status {}", .0.http_status)]
    Upstream(NormalizedError),

    /// The upstream answered successfully but the body did not have the
    /// expected shape
    #[error("Could not decode {identifier} response: {message}")]
    Decode { identifier: String, message: String },
}

impl IntegrationError {
    pub fn configuration(message: impl Into<String>) -> Self {
        IntegrationError::Configuration {
            message: message.into(),
        }
    }

    pub fn decode(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        IntegrationError::Decode {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Returns the normalized upstream error, if this is one
    pub fn as_normalized(&self) -> Option<&NormalizedError> {
        match self {
            IntegrationError::Upstream(normalized) => Some(normalized),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, IntegrationError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalized_error_carries_origin() {
        let error = NormalizedError::new(422, json!({"mensagem": "inválido"}));
        assert_eq!(error.origin, "integration-error");
        assert_eq!(error.http_status, 422);
    }

    #[test]
    fn test_upstream_display_mentions_status() {
        let error = IntegrationError::Upstream(NormalizedError::new(503, Value::Null));
        assert_eq!(error.to_string(), "Upstream call failed with status 503");
        assert_eq!(error.as_normalized().map(|n| n.http_status), Some(503));
    }

    #[test]
    fn test_configuration_is_not_normalized() {
        let error = IntegrationError::configuration("apiToken missing");
        assert!(error.is_configuration());
        assert!(error.as_normalized().is_none());
    }
}
