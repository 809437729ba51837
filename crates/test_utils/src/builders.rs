//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::sync::Arc;

use serde_json::Value;

use core_kernel::{IntegrationId, TenantId};
use domain_integration::{
    HttpTransport, InMemoryCredentialsStore, InMemoryRequestCounter, IntegrationEnvironment,
    IntegrationRecord, MatrixApi, MatrixSettings, RetryCondition,
};

use crate::fixtures::{CredentialFixtures, CLINIC_CREDENTIALS_REF};
use crate::recording::{RecordingAuditSink, RecordingErrorTracker};

/// Builder for integration records
pub struct IntegrationRecordBuilder {
    record: IntegrationRecord,
}

impl Default for IntegrationRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrationRecordBuilder {
    /// Production Matrix integration using the default credentials reference
    pub fn new() -> Self {
        Self {
            record: IntegrationRecord::matrix(TenantId::new(), CLINIC_CREDENTIALS_REF),
        }
    }

    pub fn with_id(mut self, id: IntegrationId) -> Self {
        self.record.id = id;
        self
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.record.tenant_id = tenant_id;
        self
    }

    pub fn with_environment(mut self, environment: IntegrationEnvironment) -> Self {
        self.record.environment = environment;
        self
    }

    pub fn with_credentials_ref(mut self, credentials_ref: impl Into<String>) -> Self {
        self.record.credentials_ref = credentials_ref.into();
        self
    }

    pub fn with_debug(mut self) -> Self {
        self.record.debug = true;
        self
    }

    pub fn allowing_invalid_certs(mut self) -> Self {
        self.record.allow_invalid_certs = true;
        self
    }

    pub fn build(self) -> IntegrationRecord {
        self.record
    }
}

/// A `MatrixApi` wired to recording collaborators
pub struct MatrixHarness {
    pub api: Arc<MatrixApi>,
    pub credentials: Arc<InMemoryCredentialsStore>,
    pub audit: Arc<RecordingAuditSink>,
    pub errors: Arc<RecordingErrorTracker>,
    pub counter: Arc<InMemoryRequestCounter>,
}

impl MatrixHarness {
    /// Waits for background audit and error delivery
    pub async fn flush(&self) {
        self.api.flush().await;
    }
}

/// Builder for [`MatrixHarness`]
///
/// Defaults: credentials for [`CLINIC_CREDENTIALS_REF`] pointing at
/// `api_url`, no retries, real reqwest transport.
pub struct MatrixHarnessBuilder {
    settings: MatrixSettings,
    bundles: Vec<(String, Value)>,
    transport: Option<Arc<dyn HttpTransport>>,
    audit: Arc<RecordingAuditSink>,
}

impl MatrixHarnessBuilder {
    pub fn new(api_url: &str) -> Self {
        Self {
            settings: MatrixSettings {
                max_retries: 0,
                ..MatrixSettings::default()
            },
            bundles: vec![(
                CLINIC_CREDENTIALS_REF.to_string(),
                CredentialFixtures::matrix_bundle(api_url),
            )],
            transport: None,
            audit: Arc::new(RecordingAuditSink::new()),
        }
    }

    /// Replaces the default bundle
    pub fn with_bundle(mut self, bundle: Value) -> Self {
        self.bundles = vec![(CLINIC_CREDENTIALS_REF.to_string(), bundle)];
        self
    }

    pub fn with_extra_bundle(mut self, key: impl Into<String>, bundle: Value) -> Self {
        self.bundles.push((key.into(), bundle));
        self
    }

    pub fn with_settings(mut self, settings: MatrixSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enables the default quadratic retry policy with the given condition
    pub fn with_retries(mut self, condition: RetryCondition) -> Self {
        self.settings.max_retries = 3;
        self.settings.retry_condition = condition;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<RecordingAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Builds the harness; must run inside a tokio runtime
    pub fn build(self) -> MatrixHarness {
        let credentials = Arc::new(InMemoryCredentialsStore::with_bundles(self.bundles));
        let errors = Arc::new(RecordingErrorTracker::new());
        let counter = Arc::new(InMemoryRequestCounter::new());

        let mut builder = MatrixApi::builder()
            .settings(self.settings)
            .credentials(credentials.clone())
            .audit_sink(self.audit.clone())
            .error_sink(errors.clone())
            .metrics(counter.clone());
        if let Some(transport) = self.transport {
            builder = builder.transport(transport);
        }

        let api = match builder.build() {
            Ok(api) => Arc::new(api),
            Err(e) => panic!("failed to build Matrix client: {}", e),
        };

        MatrixHarness {
            api,
            credentials,
            audit: self.audit,
            errors,
            counter,
        }
    }
}
