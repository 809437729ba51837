//! HTTP API Layer
//!
//! This crate provides the REST API for the clinic integrations service
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: One handler per upstream operation, scoped to an integration
//! - **Middleware**: Authentication, per-route permissions, audit logging
//! - **DTOs**: Validated request bodies converted into upstream payloads
//! - **Error Handling**: Upstream failures relayed in the normalized shape
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_catalog(config, catalog)?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use core_kernel::IntegrationId;
use domain_integration::{
    InMemoryCredentialsStore, InMemoryIntegrationRepository, InMemoryRequestCounter,
    IntegrationError, IntegrationRecord, IntegrationRepository, MatrixApi,
};

use crate::config::{ApiConfig, IntegrationCatalog};
use crate::error::ApiError;
use crate::handlers::{health, matrix};
use crate::middleware::{audit_middleware, auth_middleware, require_read, require_write};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub integrations: Arc<dyn IntegrationRepository>,
    pub matrix: Arc<MatrixApi>,
    pub request_counter: Arc<InMemoryRequestCounter>,
}

impl AppState {
    /// Builds the state from a loaded catalog
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_catalog(config: ApiConfig, catalog: IntegrationCatalog) -> Result<Self, IntegrationError> {
        let request_counter = Arc::new(InMemoryRequestCounter::new());
        let matrix = MatrixApi::builder()
            .settings(config.matrix.clone())
            .credentials(Arc::new(InMemoryCredentialsStore::with_bundles(catalog.credentials)))
            .metrics(request_counter.clone())
            .build()?;

        Ok(Self {
            config,
            integrations: Arc::new(InMemoryIntegrationRepository::with_records(catalog.integrations)),
            matrix: Arc::new(matrix),
            request_counter,
        })
    }

    /// Looks an integration up by id
    pub async fn integration(&self, id: Uuid) -> Result<IntegrationRecord, ApiError> {
        self.integrations
            .find(IntegrationId::from(id))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Integration {} not found", id)))
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let matrix_read_routes = Router::new()
        .route("/units", get(matrix::list_units))
        .route("/insurances", get(matrix::list_insurances))
        .route("/insurances/:code/plans", get(matrix::list_insurance_plans))
        .route("/doctors", get(matrix::list_doctors))
        .route("/specialities", get(matrix::list_specialities))
        .route("/procedures", get(matrix::list_procedures))
        .route("/available-schedules", post(matrix::list_available_schedules))
        .route(
            "/available-schedules/intelligent",
            post(matrix::list_available_schedules_intelligent),
        )
        .route("/patients/lookup", post(matrix::find_patient))
        .route("/patients/:code/schedules", get(matrix::list_patient_schedules))
        .route_layer(axum_middleware::from_fn(require_read));

    let matrix_write_routes = Router::new()
        .route("/schedules/block", post(matrix::block_schedule))
        .route("/schedules", post(matrix::create_schedule))
        .route("/schedules/:code/cancel", post(matrix::cancel_schedule))
        .route("/schedules/:code/confirm", post(matrix::confirm_schedule))
        .route("/patients", post(matrix::create_patient))
        .route("/patients/:code", put(matrix::update_patient))
        .route("/patients/password-recovery", post(matrix::recover_password))
        .route_layer(axum_middleware::from_fn(require_write));

    // Protected API routes
    let api_routes = Router::new()
        .nest(
            "/integrations/:integration_id/matrix",
            matrix_read_routes.merge(matrix_write_routes),
        )
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
