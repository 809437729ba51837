//! Retry policy for upstream calls
//!
//! [`RetryingTransport`] wraps any [`HttpTransport`] and transparently
//! retries failed sends. The delay before retry `n` (1-based) is
//! `n² × base_delay`, so the default policy waits 0.5s, 2s and 4.5s.
//!
//! Retries happen below any error-body inspection: a failure that an adapter
//! later treats as benign has already paid the full backoff.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::transport::{HttpTransport, OutboundRequest, TransportError, TransportResponse};

/// Which failures are worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryCondition {
    /// Any status above 400, or a timeout. Client errors are retried too.
    #[default]
    StatusAbove400OrTimeout,
    /// Server errors, 429, timeouts and connection failures only
    TransientOnly,
}

impl RetryCondition {
    pub fn should_retry(&self, error: &TransportError) -> bool {
        match self {
            RetryCondition::StatusAbove400OrTimeout => match error {
                TransportError::Status { status, .. } => *status > 400,
                TransportError::Timeout => true,
                _ => false,
            },
            RetryCondition::TransientOnly => match error {
                TransportError::Status { status, .. } => *status >= 500 || *status == 429,
                TransportError::Timeout | TransportError::Connect(_) => true,
                TransportError::Request(_) => false,
            },
        }
    }
}

/// Bounded quadratic-backoff retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub condition: RetryCondition,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            condition: RetryCondition::default(),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry.saturating_mul(retry))
    }
}

/// Transport decorator applying a [`RetryPolicy`] to every send
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let mut retry = 0;

        loop {
            match self.inner.send(request.clone()).await {
                Ok(response) => {
                    if retry > 0 {
                        debug!(url = %request.url, retries = retry, "Upstream call succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if retry >= self.policy.max_retries || !self.policy.condition.should_retry(&error) {
                        return Err(error);
                    }

                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    warn!(
                        url = %request.url,
                        retry = retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Upstream call failed, retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            body: None,
        }
    }

    #[test]
    fn test_default_delays_are_quadratic() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4500));
    }

    #[test]
    fn test_legacy_condition_retries_client_errors_above_400() {
        let condition = RetryCondition::StatusAbove400OrTimeout;
        assert!(!condition.should_retry(&status(400)));
        assert!(condition.should_retry(&status(401)));
        assert!(condition.should_retry(&status(404)));
        assert!(condition.should_retry(&status(500)));
        assert!(condition.should_retry(&TransportError::Timeout));
        assert!(!condition.should_retry(&TransportError::Connect("refused".into())));
    }

    #[test]
    fn test_transient_condition_skips_client_errors() {
        let condition = RetryCondition::TransientOnly;
        assert!(!condition.should_retry(&status(400)));
        assert!(!condition.should_retry(&status(404)));
        assert!(condition.should_retry(&status(429)));
        assert!(condition.should_retry(&status(502)));
        assert!(condition.should_retry(&TransportError::Timeout));
        assert!(condition.should_retry(&TransportError::Connect("reset".into())));
        assert!(!condition.should_retry(&TransportError::Request("bad url".into())));
    }

    #[test]
    fn test_condition_deserializes_from_snake_case() {
        let condition: RetryCondition = serde_json::from_str("\"transient_only\"").unwrap();
        assert_eq!(condition, RetryCondition::TransientOnly);
    }

    proptest! {
        #[test]
        fn prop_delay_is_retry_squared_times_base(retry in 1u32..50, base_ms in 1u64..2_000) {
            let policy = RetryPolicy {
                base_delay: Duration::from_millis(base_ms),
                ..RetryPolicy::default()
            };
            let expected = Duration::from_millis(base_ms * u64::from(retry) * u64::from(retry));
            prop_assert_eq!(policy.delay_for(retry), expected);
        }
    }
}
