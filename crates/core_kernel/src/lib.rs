//! Core Kernel - Foundational types for the clinic integrations service
//!
//! This crate provides the building blocks shared by the integration domain
//! and the API layer:
//! - Strongly-typed identifiers for tenants, integrations and audit records
//! - Core error types
//! - Port infrastructure (error type, marker trait, event sinks)

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{IntegrationId, TenantId, AuditEventId, ErrorReportId};
pub use error::CoreError;
pub use ports::{PortError, DomainPort, EventSink};
