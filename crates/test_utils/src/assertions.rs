//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for integration results that give
//! more meaningful error messages than standard assertions.

use std::fmt::Debug;

use domain_integration::{IntegrationError, NormalizedError, OutboundRequest, INTEGRATION_ERROR_ORIGIN};

/// Asserts that a result is a normalized upstream error with the given status
///
/// Returns the normalized error for further inspection.
///
/// # Panics
///
/// Panics if the result is a success, a non-upstream error, or carries a
/// different status or origin.
pub fn assert_upstream_error<T: Debug>(
    result: Result<T, IntegrationError>,
    expected_status: u16,
) -> NormalizedError {
    match result {
        Ok(value) => panic!("Expected upstream error {}, got success: {:?}", expected_status, value),
        Err(IntegrationError::Upstream(normalized)) => {
            assert_eq!(
                normalized.http_status, expected_status,
                "Unexpected upstream status, body: {}",
                normalized.body
            );
            assert_eq!(normalized.origin, INTEGRATION_ERROR_ORIGIN);
            normalized
        }
        Err(other) => panic!("Expected upstream error {}, got: {:?}", expected_status, other),
    }
}

/// Asserts that a result is a configuration error
pub fn assert_configuration_error<T: Debug>(result: Result<T, IntegrationError>) {
    match result {
        Err(IntegrationError::Configuration { .. }) => {}
        other => panic!("Expected configuration error, got: {:?}", other),
    }
}

/// Asserts that a request carries a header with exactly this value
pub fn assert_header(request: &OutboundRequest, name: &str, expected: &str) {
    assert_eq!(
        request.header(name),
        Some(expected),
        "Header {} mismatch on {} {}",
        name,
        request.method,
        request.url
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assert_upstream_error_returns_normalized() {
        let result: Result<(), IntegrationError> =
            Err(IntegrationError::Upstream(NormalizedError::new(404, json!("x"))));
        let normalized = assert_upstream_error(result, 404);
        assert_eq!(normalized.body, json!("x"));
    }

    #[test]
    #[should_panic(expected = "Expected configuration error")]
    fn test_assert_configuration_error_panics_on_success() {
        assert_configuration_error::<()>(Ok(()));
    }
}
