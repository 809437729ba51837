//! Integration Domain
//!
//! This crate connects tenant integrations to upstream clinic-management
//! systems. It owns the integration records, credential resolution, the
//! audited and retrying HTTP transport, and the upstream adapters.
//!
//! # Call pipeline
//!
//! Every upstream call goes through the same stages:
//!
//! - **Credentials**: resolved per call from the `CredentialsStore` for the
//!   integration's environment; missing fields are configuration errors
//! - **Transport**: pooled reqwest client wrapped in a quadratic-backoff
//!   `RetryingTransport`
//! - **Audit**: mutating calls record request and response payloads,
//!   failures record the error; delivery happens in the background
//! - **Normalization**: known benign upstream errors are absorbed per
//!   endpoint, everything else becomes a `NormalizedError`
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_integration::{IntegrationRecord, MatrixApi, InMemoryCredentialsStore};
//! use core_kernel::TenantId;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = InMemoryCredentialsStore::with_bundles(vec![(
//!     "clinic-a".to_string(),
//!     json!({"production": {"apiUrl": "https://matrix.example.com", "apiToken": "t0k3n"}}),
//! )]);
//! let matrix = MatrixApi::builder().credentials(Arc::new(store)).build()?;
//!
//! let integration = IntegrationRecord::matrix(TenantId::new(), "clinic-a");
//! let specialities = matrix.list_specialities(&integration).await?;
//! ```

pub mod integration;
pub mod error;
pub mod ports;
pub mod credentials;
pub mod transport;
pub mod retry;
pub mod dispatch;
pub mod audit;
pub mod telemetry;
pub mod adapters;

pub use integration::{IntegrationEnvironment, IntegrationRecord, IntegrationType};
pub use error::{IntegrationError, NormalizedError, INTEGRATION_ERROR_ORIGIN};
pub use ports::{CredentialsStore, IntegrationRepository, MetricsCounter};
pub use credentials::{CredentialResolver, MatrixCredentials};
pub use transport::{
    HttpTransport, Method, OutboundRequest, ReqwestTransport, TransportConfig, TransportError,
    TransportResponse,
};
pub use retry::{RetryCondition, RetryPolicy, RetryingTransport};
pub use dispatch::BackgroundDispatcher;
pub use audit::{AuditDataType, AuditEmitter, AuditEvent, TracingAuditSink};
pub use telemetry::{ErrorReport, ErrorReporter, RequestMetadata, TracingErrorTracker};
pub use adapters::{
    InMemoryCredentialsStore, InMemoryIntegrationRepository, InMemoryRequestCounter, MatrixApi,
    MatrixApiBuilder, MatrixSettings,
};
