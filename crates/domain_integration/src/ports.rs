//! Integration Domain Ports
//!
//! Collaborator ports consumed by the upstream adapters. Each port is a
//! narrow, read-only or write-only seam; the adapters never own the data
//! behind them.
//!
//! - `IntegrationRepository`: looks integration records up by id
//! - `CredentialsStore`: read-only key/value lookup of credential bundles
//! - `MetricsCounter`: outbound request counter labelled by integration type
//!
//! Audit records and error reports go through `core_kernel::EventSink`.
//!
//! In-memory implementations live in [`crate::adapters::memory`].

use async_trait::async_trait;
use serde_json::Value;

use core_kernel::{DomainPort, IntegrationId, PortError};

use crate::integration::IntegrationRecord;

/// Lookup of tenant integration records
#[async_trait]
pub trait IntegrationRepository: DomainPort {
    /// Returns the integration with the given id, if any
    async fn find(&self, id: IntegrationId) -> Result<Option<IntegrationRecord>, PortError>;

    /// Returns every known integration
    async fn list(&self) -> Result<Vec<IntegrationRecord>, PortError>;
}

/// Read-only credential bundle lookup keyed by credentials reference
///
/// Bundles are opaque JSON documents; each adapter's resolver gives them a
/// typed shape. Implementations may cache, but must never hand out a bundle
/// stored under a different key.
#[async_trait]
pub trait CredentialsStore: DomainPort {
    async fn get(&self, key: &str) -> Result<Option<Value>, PortError>;
}

/// Counter incremented once per outbound HTTP request
///
/// Callers ignore failures; a broken metrics backend must never affect an
/// upstream call.
pub trait MetricsCounter: DomainPort {
    fn increment(&self, integration_type: &str) -> Result<(), PortError>;
}
