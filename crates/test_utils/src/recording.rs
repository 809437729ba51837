//! Recording Collaborators
//!
//! In-memory implementations of the event sinks and the HTTP transport that
//! remember everything they see, so tests can assert on audit ordering,
//! error reports and the exact requests sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use core_kernel::{EventSink, PortError};
use domain_integration::{
    AuditDataType, AuditEvent, ErrorReport, HttpTransport, OutboundRequest, TransportError,
    TransportResponse,
};

/// Audit sink keeping every delivered event in order
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Data types of the delivered events, in delivery order
    pub fn data_types(&self) -> Vec<AuditDataType> {
        self.events().iter().map(|e| e.data_type).collect()
    }

    pub fn of_type(&self, data_type: AuditDataType) -> Vec<AuditEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.data_type == data_type)
            .collect()
    }
}

#[async_trait]
impl EventSink<AuditEvent> for RecordingAuditSink {
    async fn deliver(&self, event: AuditEvent) -> Result<(), PortError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Error tracker keeping every delivered report
#[derive(Debug, Default)]
pub struct RecordingErrorTracker {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink<ErrorReport> for RecordingErrorTracker {
    async fn deliver(&self, report: ErrorReport) -> Result<(), PortError> {
        self.reports.lock().unwrap().push(report);
        Ok(())
    }
}

/// Sink rejecting every event
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

#[async_trait]
impl<E: Send + 'static> EventSink<E> for FailingSink {
    async fn deliver(&self, _event: E) -> Result<(), PortError> {
        Err(PortError::connection("sink unavailable"))
    }
}

/// Transport answering from a script and recording every request
///
/// Once the script is exhausted every further send answers `fallback`.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    fallback: Result<TransportResponse, TransportError>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<TransportResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Ok(Self::ok(Value::Null)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: Result<TransportResponse, TransportError>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn ok(body: Value) -> TransportResponse {
        TransportResponse { status: 200, body }
    }

    pub fn status(status: u16, body: Value) -> TransportError {
        TransportError::Status {
            status,
            body: Some(body),
        }
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
