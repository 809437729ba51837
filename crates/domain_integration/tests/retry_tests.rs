//! Retry and backoff tests driven by a scripted transport on paused time

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use domain_integration::{AuditDataType, RetryCondition, TransportError};
use test_utils::*;

fn server_error() -> Result<domain_integration::TransportResponse, TransportError> {
    Err(ScriptedTransport::status(500, json!({"mensagem": "Erro interno"})))
}

fn harness_with(transport: Arc<ScriptedTransport>, condition: RetryCondition) -> MatrixHarness {
    MatrixHarnessBuilder::new("https://matrix.example.com/api")
        .with_transport(transport)
        .with_retries(condition)
        .build()
}

// ============================================================================
// Backoff Tests
// ============================================================================

mod backoff_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_two_server_errors() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            server_error(),
            server_error(),
            Ok(ScriptedTransport::ok(json!({"unidades": [{"codigo": 1, "nome": "Centro"}]}))),
        ]));
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        let started = Instant::now();
        let units = h.api.list_units(&IntegrationFixtures::production()).await.unwrap();
        let elapsed = started.elapsed();
        h.flush().await;

        assert_eq!(units.len(), 1);
        assert_eq!(transport.request_count(), 3);
        // 0.5s + 2s
        assert!(elapsed >= Duration::from_millis(2500), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(4500), "elapsed {:?}", elapsed);
        assert!(h.audit.events().is_empty());
        // Retries below the adapter count as one outbound request
        assert_eq!(h.counter.count("matrix"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![]).with_fallback(server_error()));
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        let started = Instant::now();
        let result = h.api.list_units(&IntegrationFixtures::production()).await;
        let elapsed = started.elapsed();
        h.flush().await;

        assert_upstream_error(result, 500);
        assert_eq!(transport.request_count(), 4);
        // 0.5s + 2s + 4.5s
        assert!(elapsed >= Duration::from_millis(7000), "elapsed {:?}", elapsed);
        assert_eq!(h.audit.data_types(), vec![AuditDataType::ExternalResponseError]);
        assert_eq!(h.errors.reports().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_400_is_never_retried() {
        let transport = Arc::new(
            ScriptedTransport::new(vec![]).with_fallback(Err(ScriptedTransport::status(400, json!("inválido")))),
        );
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        let result = h.api.list_units(&IntegrationFixtures::production()).await;

        assert_upstream_error(result, 400);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_legacy_condition_retries_404_but_transient_does_not() {
        let not_found = || Err(ScriptedTransport::status(404, json!("não encontrado")));

        let legacy = Arc::new(ScriptedTransport::new(vec![]).with_fallback(not_found()));
        let h = harness_with(legacy.clone(), RetryCondition::StatusAbove400OrTimeout);
        assert_upstream_error(h.api.list_units(&IntegrationFixtures::production()).await, 404);
        assert_eq!(legacy.request_count(), 4);

        let transient = Arc::new(ScriptedTransport::new(vec![]).with_fallback(not_found()));
        let h = harness_with(transient.clone(), RetryCondition::TransientOnly);
        assert_upstream_error(h.api.list_units(&IntegrationFixtures::production()).await, 404);
        assert_eq!(transient.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_are_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportError::Timeout),
            Ok(ScriptedTransport::ok(json!({"especialidades": []}))),
        ]));
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        h.api
            .list_specialities(&IntegrationFixtures::production())
            .await
            .unwrap();
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_benign_error_pays_full_backoff_before_being_absorbed() {
        let transport = Arc::new(
            ScriptedTransport::new(vec![]).with_fallback(Err(ScriptedTransport::status(
                404,
                json!({"mensagem": "Não foram encontrados horários disponíveis"}),
            ))),
        );
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        let slots = h
            .api
            .list_available_schedules(
                &IntegrationFixtures::production(),
                &PayloadFixtures::available_schedule_query(),
            )
            .await
            .unwrap();

        assert!(slots.is_empty());
        assert_eq!(transport.request_count(), 4);
    }

    fn rejected_token() -> Result<domain_integration::TransportResponse, TransportError> {
        Err(ScriptedTransport::status(401, json!({"mensagem": "Token expirado"})))
    }

    fn login(token: &str) -> Result<domain_integration::TransportResponse, TransportError> {
        Ok(ScriptedTransport::ok(json!({"token": token})))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_session_token_is_retried_before_relogin() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            login("sess-1"),
            rejected_token(),
            rejected_token(),
            rejected_token(),
            rejected_token(),
            login("sess-2"),
            Ok(ScriptedTransport::ok(json!({"paciente": PayloadFixtures::patient_json(4512)}))),
        ]));
        let h = harness_with(transport.clone(), RetryCondition::StatusAbove400OrTimeout);

        let started = Instant::now();
        let found = h
            .api
            .find_patient(&IntegrationFixtures::production(), &PayloadFixtures::patient_lookup())
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(found.is_some());
        assert_eq!(transport.request_count(), 7);
        // 401 is above 400: the stale token pays 0.5s + 2s + 4.5s first
        assert!(elapsed >= Duration::from_millis(7000), "elapsed {:?}", elapsed);
        let requests = transport.requests();
        assert_header(&requests[4], "Token", "Bearer sess-1");
        assert!(requests[5].url.ends_with("/login"));
        assert_header(&requests[6], "Token", "Bearer sess-2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_only_relogs_in_without_backoff() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            login("sess-1"),
            rejected_token(),
            login("sess-2"),
            Ok(ScriptedTransport::ok(json!({"paciente": PayloadFixtures::patient_json(4512)}))),
        ]));
        let h = harness_with(transport.clone(), RetryCondition::TransientOnly);

        let started = Instant::now();
        let found = h
            .api
            .find_patient(&IntegrationFixtures::production(), &PayloadFixtures::patient_lookup())
            .await
            .unwrap();

        assert!(found.is_some());
        assert_eq!(transport.request_count(), 4);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_header(&transport.requests()[3], "Token", "Bearer sess-2");
    }
}

// ============================================================================
// Request Shape Tests
// ============================================================================

mod request_shape_tests {
    use super::*;

    #[tokio::test]
    async fn test_certificate_validation_follows_integration_flag() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let h = harness_with(transport.clone(), RetryCondition::TransientOnly);

        h.api.list_units(&IntegrationFixtures::production()).await.unwrap();
        let lenient = IntegrationRecordBuilder::new().allowing_invalid_certs().build();
        h.api.list_units(&lenient).await.unwrap();

        let requests = transport.requests();
        assert!(!requests[0].allow_invalid_certs);
        assert!(requests[1].allow_invalid_certs);
    }

    #[tokio::test]
    async fn test_urls_join_base_and_path() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let h = harness_with(transport.clone(), RetryCondition::TransientOnly);

        h.api
            .list_insurance_plans(&IntegrationFixtures::production(), 20)
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://matrix.example.com/api/convenios/20/planos");
        assert_header(request, "Authorization", &format!("Bearer {}", STATIC_TOKEN));
    }

    #[tokio::test]
    async fn test_login_is_counted_and_carries_no_bearer() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(ScriptedTransport::ok(json!({"token": "sess-9"}))),
            Ok(ScriptedTransport::ok(json!({"paciente": null}))),
        ]));
        let h = harness_with(transport.clone(), RetryCondition::TransientOnly);

        h.api
            .find_patient(&IntegrationFixtures::production(), &PayloadFixtures::patient_lookup())
            .await
            .unwrap();

        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/login"));
        assert!(requests[0].header("Authorization").is_none());
        assert_header(&requests[1], "Token", "Bearer sess-9");
        assert_eq!(h.counter.count("matrix"), 2);
    }

    #[tokio::test]
    async fn test_login_without_token_fails_the_call() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(ScriptedTransport::ok(json!({})))]));
        let h = harness_with(transport.clone(), RetryCondition::TransientOnly);

        let result = h
            .api
            .find_patient(&IntegrationFixtures::production(), &PayloadFixtures::patient_lookup())
            .await;

        let normalized = assert_upstream_error(result, 400);
        assert!(normalized.body.as_str().unwrap_or("").contains("login response"));
        assert_eq!(transport.request_count(), 1);
    }
}
