//! Integration records
//!
//! An integration is a tenant's configured connection to one upstream
//! clinic-management system. Records are owned by the integration-management
//! side of the service; adapters only ever borrow them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use core_kernel::{CoreError, IntegrationId, TenantId};

/// Upstream system an integration talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    /// The Matrix clinic-management API
    Matrix,
}

impl IntegrationType {
    /// Label used for metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationType::Matrix => "matrix",
        }
    }
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream environment an integration points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationEnvironment {
    Production,
    Test,
}

impl IntegrationEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationEnvironment::Production => "production",
            IntegrationEnvironment::Test => "test",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, IntegrationEnvironment::Test)
    }
}

impl fmt::Display for IntegrationEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationEnvironment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(IntegrationEnvironment::Production),
            "test" | "homologacao" => Ok(IntegrationEnvironment::Test),
            other => Err(CoreError::validation(format!(
                "Unknown integration environment: {}",
                other
            ))),
        }
    }
}

/// Tenant-scoped configuration identifying which upstream system to call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRecord {
    pub id: IntegrationId,
    pub tenant_id: TenantId,
    pub integration_type: IntegrationType,
    pub environment: IntegrationEnvironment,
    /// Logs outgoing payloads for this integration when set
    #[serde(default)]
    pub debug: bool,
    /// Key used to look the credential bundle up in the credentials store
    pub credentials_ref: String,
    /// Disables TLS certificate validation for this integration only
    #[serde(default)]
    pub allow_invalid_certs: bool,
}

impl IntegrationRecord {
    /// Creates a production Matrix integration for the given tenant
    pub fn matrix(tenant_id: TenantId, credentials_ref: impl Into<String>) -> Self {
        Self {
            id: IntegrationId::new(),
            tenant_id,
            integration_type: IntegrationType::Matrix,
            environment: IntegrationEnvironment::Production,
            debug: false,
            credentials_ref: credentials_ref.into(),
            allow_invalid_certs: false,
        }
    }

    pub fn with_environment(mut self, environment: IntegrationEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
