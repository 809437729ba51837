//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal layout of the integrations service.
//! The integration domain talks to its collaborators (credential stores,
//! audit sinks, error trackers, metrics backends) only through port traits;
//! adapters implement those traits with in-memory, tracing or remote backends.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               Upstream adapters (Matrix, ...)            │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Port Traits                        │
//! │  CredentialsStore, EventSink<E>, MetricsCounter, ...     │
//! └──────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!         ┌─────────┴─────────┐     ┌────────┴─────────┐
//!         │  In-memory / log  │     │  Remote backends │
//!         └───────────────────┘     └──────────────────┘
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for port operations
///
/// Every collaborator port reports failures with this type so the adapter
/// can decide uniformly whether a failure is fatal or may be swallowed.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entry was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Connection to the backing system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backing system is unavailable or saturated
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A data transformation error occurred
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entry was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Port traits extend this marker so implementations are thread-safe and
/// usable behind `Arc<dyn ...>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// A write-only destination for events of type `E`
///
/// Sinks receive audit records, error reports and similar fire-and-forget
/// events. Callers never wait on a sink directly; see the background
/// dispatcher in the integration domain.
#[async_trait]
pub trait EventSink<E: Send + 'static>: Send + Sync {
    /// Delivers a single event to the backing system
    async fn deliver(&self, event: E) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Credentials", "clinic-a");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Credentials"));
        assert!(error.to_string().contains("clinic-a"));
    }

    #[test]
    fn test_port_error_transient() {
        assert!(PortError::connection("refused").is_transient());
        assert!(PortError::ServiceUnavailable {
            service: "audit".to_string()
        }
        .is_transient());
        assert!(!PortError::internal("boom").is_transient());
        assert!(!PortError::transformation("bad json").is_transient());
    }
}
