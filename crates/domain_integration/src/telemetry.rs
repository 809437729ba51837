//! Error tracking for failed upstream calls
//!
//! Unexpected upstream failures are forwarded to an error-tracking sink with
//! the request metadata attached. Reports are never produced for
//! integrations running against the upstream test environment.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::error;

use core_kernel::{ErrorReportId, EventSink, IntegrationId, PortError, TenantId};

use crate::dispatch::BackgroundDispatcher;
use crate::integration::{IntegrationEnvironment, IntegrationRecord};

/// Request details attached to an error report
///
/// Headers are deliberately absent: they carry credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub method: String,
    pub url: String,
    pub payload: Option<Value>,
}

/// Structured report of an unexpected upstream failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub id: ErrorReportId,
    pub integration_id: IntegrationId,
    pub tenant_id: TenantId,
    pub integration_type: String,
    pub environment: IntegrationEnvironment,
    pub identifier: String,
    pub http_status: u16,
    pub body: Value,
    pub request: RequestMetadata,
    pub occurred_at: DateTime<Utc>,
}

/// Error tracker that logs reports at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorTracker;

#[async_trait]
impl EventSink<ErrorReport> for TracingErrorTracker {
    async fn deliver(&self, report: ErrorReport) -> Result<(), PortError> {
        error!(
            target: "error_tracking",
            report_id = %report.id,
            integration_id = %report.integration_id,
            integration_type = %report.integration_type,
            identifier = %report.identifier,
            http_status = report.http_status,
            method = %report.request.method,
            url = %report.request.url,
            body = %report.body,
            "Integration call failed"
        );
        Ok(())
    }
}

/// Fire-and-forget error reporting for adapters
#[derive(Clone)]
pub struct ErrorReporter {
    dispatcher: BackgroundDispatcher<ErrorReport>,
}

impl ErrorReporter {
    pub fn spawn(sink: Arc<dyn EventSink<ErrorReport>>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (dispatcher, worker) = BackgroundDispatcher::spawn("error-tracking", sink, capacity);
        (Self { dispatcher }, worker)
    }

    /// Queues a report unless the integration targets the test environment
    ///
    /// Returns whether a report was queued.
    pub fn report(
        &self,
        integration: &IntegrationRecord,
        identifier: &str,
        http_status: u16,
        body: Value,
        request: RequestMetadata,
    ) -> bool {
        if integration.environment.is_test() {
            return false;
        }

        self.dispatcher.dispatch(ErrorReport {
            id: ErrorReportId::new_v7(),
            integration_id: integration.id,
            tenant_id: integration.tenant_id,
            integration_type: integration.integration_type.as_str().to_string(),
            environment: integration.environment,
            identifier: identifier.to_string(),
            http_status,
            body,
            request,
            occurred_at: Utc::now(),
        });
        true
    }

    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting {
        reports: Mutex<Vec<ErrorReport>>,
    }

    #[async_trait]
    impl EventSink<ErrorReport> for Collecting {
        async fn deliver(&self, report: ErrorReport) -> Result<(), PortError> {
            self.reports.lock().unwrap().push(report);
            Ok(())
        }
    }

    fn metadata() -> RequestMetadata {
        RequestMetadata {
            method: "POST".to_string(),
            url: "https://matrix.example.com/agendamentos".to_string(),
            payload: None,
        }
    }

    #[tokio::test]
    async fn test_production_failures_are_reported() {
        let sink = Arc::new(Collecting::default());
        let (reporter, _worker) = ErrorReporter::spawn(sink.clone(), 8);
        let integration = IntegrationRecord::matrix(TenantId::new(), "clinic-a");

        assert!(reporter.report(&integration, "create_schedule", 500, Value::Null, metadata()));
        reporter.flush().await;

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].identifier, "create_schedule");
        assert_eq!(reports[0].integration_type, "matrix");
    }

    #[tokio::test]
    async fn test_test_environment_is_never_reported() {
        let sink = Arc::new(Collecting::default());
        let (reporter, _worker) = ErrorReporter::spawn(sink.clone(), 8);
        let integration = IntegrationRecord::matrix(TenantId::new(), "clinic-a")
            .with_environment(IntegrationEnvironment::Test);

        assert!(!reporter.report(&integration, "create_schedule", 500, Value::Null, metadata()));
        reporter.flush().await;

        assert!(sink.reports.lock().unwrap().is_empty());
    }
}
