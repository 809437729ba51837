//! Audit events for upstream calls
//!
//! Every mutating call records the payload it sent and the payload it got
//! back; every call that ultimately fails records the failure. Records are
//! append-only and delivered in the background through an
//! [`AuditEmitter`], so a slow or broken audit sink never affects the call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::info;

use core_kernel::{AuditEventId, EventSink, IntegrationId, PortError, TenantId};

use crate::dispatch::BackgroundDispatcher;
use crate::integration::IntegrationRecord;

/// Kind of payload captured by an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditDataType {
    ExternalRequest,
    ExternalResponse,
    ExternalResponseError,
}

impl AuditDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditDataType::ExternalRequest => "externalRequest",
            AuditDataType::ExternalResponse => "externalResponse",
            AuditDataType::ExternalResponseError => "externalResponseError",
        }
    }
}

/// A recorded request, response or error payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub data_type: AuditDataType,
    pub integration_id: IntegrationId,
    pub tenant_id: TenantId,
    /// Name of the adapter method that produced the event
    pub identifier: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        data_type: AuditDataType,
        integration: &IntegrationRecord,
        identifier: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            data_type,
            integration_id: integration.id,
            tenant_id: integration.tenant_id,
            identifier: identifier.into(),
            payload,
            created_at: Utc::now(),
        }
    }
}

/// Audit sink that writes structured records to the `audit` tracing target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl EventSink<AuditEvent> for TracingAuditSink {
    async fn deliver(&self, event: AuditEvent) -> Result<(), PortError> {
        let payload = serde_json::to_string(&event.payload)
            .map_err(|e| PortError::transformation(e.to_string()))?;

        info!(
            target: "audit",
            audit_id = %event.id,
            data_type = event.data_type.as_str(),
            integration_id = %event.integration_id,
            tenant_id = %event.tenant_id,
            identifier = %event.identifier,
            payload = %payload,
            "Integration audit event"
        );
        Ok(())
    }
}

/// Fire-and-forget audit emission for adapters
#[derive(Clone)]
pub struct AuditEmitter {
    dispatcher: BackgroundDispatcher<AuditEvent>,
}

impl AuditEmitter {
    /// Starts the background worker feeding `sink`
    pub fn spawn(sink: Arc<dyn EventSink<AuditEvent>>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (dispatcher, worker) = BackgroundDispatcher::spawn("audit", sink, capacity);
        (Self { dispatcher }, worker)
    }

    pub fn emit(
        &self,
        data_type: AuditDataType,
        integration: &IntegrationRecord,
        identifier: &str,
        payload: Value,
    ) {
        self.dispatcher
            .dispatch(AuditEvent::new(data_type, integration, identifier, payload));
    }

    /// Waits until every event emitted so far has reached the sink
    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }
}
