//! Matrix API client
//!
//! Every endpoint method runs the same template:
//!
//! 1. resolve the integration's credentials and the endpoint's auth material
//! 2. strip sentinel values from the payload
//! 3. log the request when the integration has `debug` set
//! 4. audit the request payload (mutating endpoints only)
//! 5. send through the retrying transport, counting each outbound request
//! 6. audit the response body (mutating endpoints only)
//! 7. on failure, apply the endpoint's [`Recovery`] or normalize the error
//! 8. narrow the response to the field the endpoint returns

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use core_kernel::EventSink;

use crate::adapters::memory::InMemoryRequestCounter;
use crate::audit::{AuditDataType, AuditEmitter, AuditEvent, TracingAuditSink};
use crate::credentials::{CredentialResolver, MatrixCredentials};
use crate::error::{IntegrationError, NormalizedError};
use crate::integration::IntegrationRecord;
use crate::ports::{CredentialsStore, MetricsCounter};
use crate::retry::{RetryCondition, RetryPolicy, RetryingTransport};
use crate::telemetry::{ErrorReport, ErrorReporter, RequestMetadata, TracingErrorTracker};
use crate::transport::{
    HttpTransport, Method, OutboundRequest, ReqwestTransport, TransportConfig, TransportError,
    TransportResponse,
};

use super::auth::{
    bearer, join_url, AuthMode, ResolvedAuth, AUTHORIZATION_HEADER, LOGIN_PATH,
    SESSION_TOKEN_HEADER,
};
use super::known_errors::{AVAILABLE_SCHEDULES_EMPTY, CANCEL_ALREADY_APPLIED, PROCEDURES_EMPTY};
use super::payload::{cleansed, query_pairs};
use super::recovery::Recovery;
use super::session::{fingerprint, SessionTokenCache};
use super::types::*;

/// Tunables for the Matrix adapter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatrixSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_condition: RetryCondition,
    /// Session token lifetime in seconds
    pub session_ttl_secs: u64,
    /// Bounded queue size for audit events and error reports
    pub event_queue_capacity: usize,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
            retry_condition: RetryCondition::default(),
            session_ttl_secs: 600,
            event_queue_capacity: 1024,
        }
    }
}

impl MatrixSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            condition: self.retry_condition,
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Builder for [`MatrixApi`]
///
/// Only the credentials store is required. Unset collaborators default to
/// the reqwest transport, the tracing audit sink and error tracker, and an
/// in-memory request counter. The retry policy from the settings always
/// wraps the transport, injected or not.
#[derive(Default)]
pub struct MatrixApiBuilder {
    settings: MatrixSettings,
    credentials: Option<Arc<dyn CredentialsStore>>,
    transport: Option<Arc<dyn HttpTransport>>,
    audit_sink: Option<Arc<dyn EventSink<AuditEvent>>>,
    error_sink: Option<Arc<dyn EventSink<ErrorReport>>>,
    metrics: Option<Arc<dyn MetricsCounter>>,
}

impl MatrixApiBuilder {
    pub fn settings(mut self, settings: MatrixSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn credentials(mut self, store: Arc<dyn CredentialsStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn audit_sink(mut self, sink: Arc<dyn EventSink<AuditEvent>>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    pub fn error_sink(mut self, sink: Arc<dyn EventSink<ErrorReport>>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsCounter>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the client and starts its background event workers
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<MatrixApi, IntegrationError> {
        let credentials = self
            .credentials
            .ok_or_else(|| IntegrationError::configuration("Matrix client needs a credentials store"))?;

        let inner: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(&self.settings.transport_config())
                    .map_err(|e| IntegrationError::configuration(format!("HTTP client: {}", e)))?,
            ),
        };
        let transport = Arc::new(RetryingTransport::new(inner, self.settings.retry_policy()));

        let capacity = self.settings.event_queue_capacity;
        let (audit, _) = AuditEmitter::spawn(
            self.audit_sink.unwrap_or_else(|| Arc::new(TracingAuditSink)),
            capacity,
        );
        let (errors, _) = ErrorReporter::spawn(
            self.error_sink.unwrap_or_else(|| Arc::new(TracingErrorTracker)),
            capacity,
        );

        Ok(MatrixApi {
            transport,
            credentials: CredentialResolver::new(credentials),
            sessions: SessionTokenCache::new(self.settings.session_ttl()),
            audit,
            errors,
            metrics: self
                .metrics
                .unwrap_or_else(|| Arc::new(InMemoryRequestCounter::new())),
        })
    }
}

/// One endpoint invocation
struct Call {
    identifier: &'static str,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    auth: AuthMode,
    mutating: bool,
    recovery: Recovery,
}

impl Call {
    fn new(identifier: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            identifier,
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth: AuthMode::StaticToken,
            mutating: false,
            recovery: Recovery::Propagate,
        }
    }

    fn get(identifier: &'static str, path: impl Into<String>) -> Self {
        Self::new(identifier, Method::GET, path)
    }

    fn post(identifier: &'static str, path: impl Into<String>) -> Self {
        Self::new(identifier, Method::POST, path)
    }

    fn put(identifier: &'static str, path: impl Into<String>) -> Self {
        Self::new(identifier, Method::PUT, path)
    }

    fn body<T: Serialize>(mut self, payload: &T) -> Result<Self, IntegrationError> {
        self.body = Some(cleansed(self.identifier, payload)?);
        Ok(self)
    }

    fn filter<T: Serialize>(mut self, filter: &T) -> Result<Self, IntegrationError> {
        self.query = query_pairs(&cleansed(self.identifier, filter)?);
        Ok(self)
    }

    fn session(mut self) -> Self {
        self.auth = AuthMode::SessionToken;
        self
    }

    fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    fn recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }
}

/// Result of a call that did not fail
enum CallOutcome {
    Completed(Value),
    /// A known benign upstream error was absorbed
    Recovered,
}

/// Client for the Matrix clinic-management API
///
/// Stateless with respect to integrations: every method takes the
/// integration record and resolves its credentials for that call only.
/// The only state shared across calls is the connection pool, the session
/// token cache and the background event queues.
pub struct MatrixApi {
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialResolver,
    sessions: SessionTokenCache,
    audit: AuditEmitter,
    errors: ErrorReporter,
    metrics: Arc<dyn MetricsCounter>,
}

impl MatrixApi {
    pub fn builder() -> MatrixApiBuilder {
        MatrixApiBuilder::default()
    }

    /// Waits until audit events and error reports emitted so far are delivered
    pub async fn flush(&self) {
        self.audit.flush().await;
        self.errors.flush().await;
    }

    pub async fn list_units(&self, integration: &IntegrationRecord) -> Result<Vec<Unit>, IntegrationError> {
        let call = Call::get("list_units", "/unidades");
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_units", outcome, "unidades"))
    }

    pub async fn list_insurances(
        &self,
        integration: &IntegrationRecord,
    ) -> Result<Vec<Insurance>, IntegrationError> {
        let call = Call::get("list_insurances", "/convenios");
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_insurances", outcome, "convenios"))
    }

    pub async fn list_insurance_plans(
        &self,
        integration: &IntegrationRecord,
        insurance_code: i64,
    ) -> Result<Vec<InsurancePlan>, IntegrationError> {
        let call = Call::get(
            "list_insurance_plans",
            format!("/convenios/{}/planos", insurance_code),
        );
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_insurance_plans", outcome, "planos"))
    }

    pub async fn list_doctors(
        &self,
        integration: &IntegrationRecord,
        filter: &DoctorFilter,
    ) -> Result<Vec<Doctor>, IntegrationError> {
        let call = Call::get("list_doctors", "/medicos").filter(filter)?;
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_doctors", outcome, "medicos"))
    }

    pub async fn list_specialities(
        &self,
        integration: &IntegrationRecord,
    ) -> Result<Vec<Speciality>, IntegrationError> {
        let call = Call::get("list_specialities", "/especialidades");
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_specialities", outcome, "especialidades"))
    }

    /// Lists procedures; an upstream 400 reporting an empty list yields `[]`
    pub async fn list_procedures(
        &self,
        integration: &IntegrationRecord,
        filter: &ProcedureFilter,
    ) -> Result<Vec<Procedure>, IntegrationError> {
        let call = Call::get("list_procedures", "/procedimentos")
            .filter(filter)?
            .recovery(Recovery::EmptyWhenStatusAndBodyContains {
                status: 400,
                needles: PROCEDURES_EMPTY,
            });
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_procedures", outcome, "procedimentos"))
    }

    /// Searches free slots; "no slots" style upstream errors yield `[]`
    pub async fn list_available_schedules(
        &self,
        integration: &IntegrationRecord,
        query: &AvailableScheduleQuery,
    ) -> Result<Vec<AvailableSchedule>, IntegrationError> {
        let call = Call::post("list_available_schedules", "/horarios/disponiveis")
            .body(query)?
            .recovery(Recovery::EmptyWhenBodyContains(AVAILABLE_SCHEDULES_EMPTY));
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_available_schedules", outcome, "horarios"))
    }

    pub async fn list_available_schedules_intelligent(
        &self,
        integration: &IntegrationRecord,
        query: &IntelligentScheduleQuery,
    ) -> Result<Vec<AvailableSchedule>, IntegrationError> {
        let call = Call::post("list_available_schedules_intelligent", "/horarios/inteligente")
            .body(query)?
            .recovery(Recovery::EmptyWhenBodyContains(AVAILABLE_SCHEDULES_EMPTY));
        let outcome = self.execute(integration, call).await?;
        self.narrowed(
            integration,
            list_field("list_available_schedules_intelligent", outcome, "horarios"),
        )
    }

    pub async fn block_schedule(
        &self,
        integration: &IntegrationRecord,
        request: &BlockScheduleRequest,
    ) -> Result<ScheduleBlock, IntegrationError> {
        let call = Call::post("block_schedule", "/agendamentos/bloqueio")
            .body(request)?
            .mutating();
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, whole_body("block_schedule", outcome))
    }

    pub async fn create_schedule(
        &self,
        integration: &IntegrationRecord,
        request: &CreateScheduleRequest,
    ) -> Result<CreatedSchedule, IntegrationError> {
        let call = Call::post("create_schedule", "/agendamentos")
            .body(request)?
            .mutating();
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, whole_body("create_schedule", outcome))
    }

    pub async fn create_patient(
        &self,
        integration: &IntegrationRecord,
        request: &PatientRequest,
    ) -> Result<Patient, IntegrationError> {
        let call = Call::post("create_patient", "/pacientes")
            .body(request)?
            .mutating();
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, required_field("create_patient", outcome, "paciente"))
    }

    pub async fn update_patient(
        &self,
        integration: &IntegrationRecord,
        patient_code: i64,
        request: &PatientRequest,
    ) -> Result<Patient, IntegrationError> {
        let call = Call::put("update_patient", format!("/pacientes/{}", patient_code))
            .body(request)?
            .mutating();
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, required_field("update_patient", outcome, "paciente"))
    }

    /// Looks a patient up; uses session-token authentication
    pub async fn find_patient(
        &self,
        integration: &IntegrationRecord,
        lookup: &PatientLookup,
    ) -> Result<Option<Patient>, IntegrationError> {
        let call = Call::post("find_patient", "/pacientes/busca")
            .body(lookup)?
            .session();
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, optional_field("find_patient", outcome, "paciente"))
    }

    pub async fn list_patient_schedules(
        &self,
        integration: &IntegrationRecord,
        patient_code: i64,
    ) -> Result<Vec<PatientSchedule>, IntegrationError> {
        let call = Call::get(
            "list_patient_schedules",
            format!("/pacientes/{}/agendamentos", patient_code),
        );
        let outcome = self.execute(integration, call).await?;
        self.narrowed(integration, list_field("list_patient_schedules", outcome, "agendamentos"))
    }

    /// Cancels a schedule
    ///
    /// Cancelling a schedule the upstream can no longer cancel (typically
    /// already cancelled) is treated as success.
    pub async fn cancel_schedule(
        &self,
        integration: &IntegrationRecord,
        request: &CancelScheduleRequest,
    ) -> Result<(), IntegrationError> {
        let call = Call::post("cancel_schedule", "/agendamentos/desmarcar")
            .body(request)?
            .mutating()
            .recovery(Recovery::SucceedWhenBodyContains(CANCEL_ALREADY_APPLIED));
        self.execute(integration, call).await.map(|_| ())
    }

    pub async fn confirm_schedule(
        &self,
        integration: &IntegrationRecord,
        request: &ConfirmScheduleRequest,
    ) -> Result<(), IntegrationError> {
        let call = Call::post("confirm_schedule", "/agendamentos/confirmar")
            .body(request)?
            .mutating();
        self.execute(integration, call).await.map(|_| ())
    }

    /// Starts the upstream password recovery flow; uses session-token authentication
    pub async fn recover_password(
        &self,
        integration: &IntegrationRecord,
        request: &PasswordRecoveryRequest,
    ) -> Result<(), IntegrationError> {
        let call = Call::post("recover_password", "/pacientes/recuperar-senha")
            .body(request)?
            .session()
            .mutating();
        self.execute(integration, call).await.map(|_| ())
    }

    async fn execute(
        &self,
        integration: &IntegrationRecord,
        call: Call,
    ) -> Result<CallOutcome, IntegrationError> {
        // Configuration problems surface before anything is sent or audited
        let credentials = self.credentials.resolve(integration).await?;
        let auth = call.auth.resolve(&credentials)?;
        let url = join_url(&credentials.api_url, &call.path);

        if integration.debug {
            info!(
                integration_id = %integration.id,
                identifier = call.identifier,
                method = %call.method,
                url = %url,
                payload = ?call.body,
                "Matrix request"
            );
        }

        if call.mutating {
            self.audit.emit(
                AuditDataType::ExternalRequest,
                integration,
                call.identifier,
                call.body.clone().unwrap_or(Value::Null),
            );
        }

        let mut request = OutboundRequest::new(call.method.clone(), url)
            .with_query(call.query.clone())
            .allow_invalid_certs(integration.allow_invalid_certs);
        if let Some(body) = call.body.clone() {
            request = request.with_json(body);
        }

        match self
            .dispatch(integration, &credentials, &auth, request.clone())
            .await
        {
            Ok(response) => {
                if call.mutating {
                    self.audit.emit(
                        AuditDataType::ExternalResponse,
                        integration,
                        call.identifier,
                        response.body.clone(),
                    );
                }
                Ok(CallOutcome::Completed(response.body))
            }
            Err(error) => self.recover(integration, &call, &request, error),
        }
    }

    /// Attaches auth headers and sends
    ///
    /// Session-token calls that come back 401 drop the cached token, log in
    /// again and replay once.
    async fn dispatch(
        &self,
        integration: &IntegrationRecord,
        credentials: &MatrixCredentials,
        auth: &ResolvedAuth,
        request: OutboundRequest,
    ) -> Result<TransportResponse, TransportError> {
        match auth {
            ResolvedAuth::StaticToken { api_token } => {
                let request = request.with_header(AUTHORIZATION_HEADER, bearer(api_token));
                self.send(integration, request).await
            }
            ResolvedAuth::SessionToken { username, password } => {
                let token = self
                    .session_token(integration, &credentials.api_url, username, password)
                    .await?;
                let first = self
                    .send(
                        integration,
                        request.clone().with_header(SESSION_TOKEN_HEADER, bearer(&token)),
                    )
                    .await;

                match first {
                    Err(TransportError::Status { status: 401, .. }) => {
                        debug!(
                            integration_id = %integration.id,
                            "Session token rejected, logging in again"
                        );
                        self.sessions.invalidate(integration.id, &token).await;
                        let token = self
                            .session_token(integration, &credentials.api_url, username, password)
                            .await?;
                        let replay = request.with_header(SESSION_TOKEN_HEADER, bearer(&token));
                        self.send(integration, replay).await
                    }
                    other => other,
                }
            }
        }
    }

    async fn session_token(
        &self,
        integration: &IntegrationRecord,
        api_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, TransportError> {
        let key = fingerprint(api_url, username);
        self.sessions
            .get_or_login(integration.id, &key, move || async move {
                let body = serde_json::to_value(LoginRequest {
                    login: username.to_string(),
                    password: password.to_string(),
                })
                .map_err(|e| TransportError::Request(e.to_string()))?;

                let request = OutboundRequest::new(Method::POST, join_url(api_url, LOGIN_PATH))
                    .with_json(body)
                    .allow_invalid_certs(integration.allow_invalid_certs);
                let response = self.send(integration, request).await?;

                let login: LoginResponse = serde_json::from_value(response.body)
                    .map_err(|e| TransportError::Request(format!("login response: {}", e)))?;
                debug!(integration_id = %integration.id, "Obtained Matrix session token");
                Ok::<_, TransportError>(login.token)
            })
            .await
    }

    async fn send(
        &self,
        integration: &IntegrationRecord,
        request: OutboundRequest,
    ) -> Result<TransportResponse, TransportError> {
        if let Err(e) = self.metrics.increment(integration.integration_type.as_str()) {
            debug!(error = %e, "Request counter increment failed");
        }
        self.transport.send(request).await
    }

    fn recover(
        &self,
        integration: &IntegrationRecord,
        call: &Call,
        request: &OutboundRequest,
        error: TransportError,
    ) -> Result<CallOutcome, IntegrationError> {
        let status = error.status();

        if call.recovery.applies(status, error.body()) {
            debug!(
                integration_id = %integration.id,
                identifier = call.identifier,
                status = ?status,
                "Known upstream error absorbed"
            );
            return Ok(CallOutcome::Recovered);
        }

        let http_status = status.unwrap_or(400);
        let body = error
            .body()
            .cloned()
            .unwrap_or_else(|| Value::String(error.to_string()));

        warn!(
            integration_id = %integration.id,
            identifier = call.identifier,
            http_status = http_status,
            error = %error,
            "Matrix call failed"
        );

        self.audit.emit(
            AuditDataType::ExternalResponseError,
            integration,
            call.identifier,
            json!({ "status": http_status, "body": body }),
        );
        // Built from the header-less request; credentials never reach the tracker
        self.errors.report(
            integration,
            call.identifier,
            http_status,
            body.clone(),
            RequestMetadata {
                method: request.method.to_string(),
                url: request.url.clone(),
                payload: request.body.clone(),
            },
        );

        Err(IntegrationError::Upstream(NormalizedError::new(http_status, body)))
    }

    /// Audits a successful response that does not have the expected shape
    fn narrowed<T>(
        &self,
        integration: &IntegrationRecord,
        result: Result<T, IntegrationError>,
    ) -> Result<T, IntegrationError> {
        if let Err(IntegrationError::Decode { identifier, message }) = &result {
            warn!(
                integration_id = %integration.id,
                identifier = %identifier,
                error = %message,
                "Matrix response could not be decoded"
            );
            self.audit.emit(
                AuditDataType::ExternalResponseError,
                integration,
                identifier,
                json!({ "error": message }),
            );
        }
        result
    }
}

fn decode<T: DeserializeOwned>(identifier: &str, value: Value) -> Result<T, IntegrationError> {
    serde_json::from_value(value).map_err(|e| IntegrationError::decode(identifier, e.to_string()))
}

/// Narrows to a list field; absent, null and recovered responses are empty
fn list_field<T: DeserializeOwned>(
    identifier: &str,
    outcome: CallOutcome,
    field: &str,
) -> Result<Vec<T>, IntegrationError> {
    match outcome {
        CallOutcome::Recovered => Ok(Vec::new()),
        CallOutcome::Completed(mut body) => match body.get_mut(field).map(Value::take) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(items) => decode(identifier, items),
        },
    }
}

fn optional_field<T: DeserializeOwned>(
    identifier: &str,
    outcome: CallOutcome,
    field: &str,
) -> Result<Option<T>, IntegrationError> {
    match outcome {
        CallOutcome::Recovered => Ok(None),
        CallOutcome::Completed(mut body) => match body.get_mut(field).map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode(identifier, value).map(Some),
        },
    }
}

fn required_field<T: DeserializeOwned>(
    identifier: &str,
    outcome: CallOutcome,
    field: &str,
) -> Result<T, IntegrationError> {
    optional_field(identifier, outcome, field)?.ok_or_else(|| {
        IntegrationError::decode(identifier, format!("response has no `{}` field", field))
    })
}

fn whole_body<T: DeserializeOwned>(identifier: &str, outcome: CallOutcome) -> Result<T, IntegrationError> {
    match outcome {
        CallOutcome::Completed(body) => decode(identifier, body),
        CallOutcome::Recovered => Err(IntegrationError::decode(identifier, "empty response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = MatrixSettings::default();
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.session_ttl(), Duration::from_secs(600));
        assert_eq!(settings.transport_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_settings_deserialize_partially() {
        let settings: MatrixSettings = serde_json::from_value(json!({
            "max_retries": 1,
            "retry_condition": "transient_only"
        }))
        .unwrap();
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.retry_condition, RetryCondition::TransientOnly);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_list_field_narrowing() {
        let outcome = CallOutcome::Completed(json!({"unidades": [{"codigo": 1, "nome": "Centro"}]}));
        let units: Vec<Unit> = list_field("list_units", outcome, "unidades").unwrap();
        assert_eq!(units[0].name, "Centro");

        let missing: Vec<Unit> =
            list_field("list_units", CallOutcome::Completed(json!({})), "unidades").unwrap();
        assert!(missing.is_empty());

        let recovered: Vec<Unit> = list_field("list_units", CallOutcome::Recovered, "unidades").unwrap();
        assert!(recovered.is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let outcome = CallOutcome::Completed(json!({"unidades": "nope"}));
        let err = list_field::<Unit>("list_units", outcome, "unidades").unwrap_err();
        assert!(matches!(err, IntegrationError::Decode { ref identifier, .. } if identifier == "list_units"));
    }

    #[test]
    fn test_required_field_missing_is_decode_error() {
        let err = required_field::<Patient>("create_patient", CallOutcome::Completed(json!({})), "paciente")
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Decode { .. }));
    }

    #[test]
    fn test_call_filter_strips_sentinels_into_query() {
        let filter = DoctorFilter {
            unit_code: Some(3),
            speciality_code: Some(-1),
        };
        let call = Call::get("list_doctors", "/medicos").filter(&filter).unwrap();
        assert_eq!(call.query, vec![("unidade".to_string(), "3".to_string())]);
    }

    #[tokio::test]
    async fn test_build_requires_credentials_store() {
        let err = MatrixApi::builder().build().err().unwrap();
        assert!(err.is_configuration());
    }
}
