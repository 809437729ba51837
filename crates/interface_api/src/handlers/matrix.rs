//! Matrix handlers
//!
//! Every route is scoped to one integration; the record is looked up first
//! and the call is delegated to the shared `MatrixApi`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain_integration::adapters::matrix::{
    AvailableSchedule, ConfirmScheduleRequest, CreatedSchedule, Doctor, Insurance, InsurancePlan,
    Patient, PatientSchedule, Procedure, ScheduleBlock, Speciality, Unit,
};

use crate::dto::matrix::*;
use crate::{error::ApiError, AppState};

pub async fn list_units(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
) -> Result<Json<Vec<Unit>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.list_units(&integration).await?))
}

pub async fn list_insurances(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
) -> Result<Json<Vec<Insurance>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.list_insurances(&integration).await?))
}

pub async fn list_insurance_plans(
    State(state): State<AppState>,
    Path((integration_id, insurance_code)): Path<(Uuid, i64)>,
) -> Result<Json<Vec<InsurancePlan>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(
        state
            .matrix
            .list_insurance_plans(&integration, insurance_code)
            .await?,
    ))
}

pub async fn list_doctors(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.list_doctors(&integration, &query.into()).await?))
}

pub async fn list_specialities(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
) -> Result<Json<Vec<Speciality>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.list_specialities(&integration).await?))
}

pub async fn list_procedures(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Query(query): Query<ProcedureQuery>,
) -> Result<Json<Vec<Procedure>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.list_procedures(&integration, &query.into()).await?))
}

pub async fn list_available_schedules(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(request): Json<ScheduleSearchRequest>,
) -> Result<Json<Vec<AvailableSchedule>>, ApiError> {
    request.validate()?;
    let integration = state.integration(integration_id).await?;
    Ok(Json(
        state
            .matrix
            .list_available_schedules(&integration, &request.into())
            .await?,
    ))
}

pub async fn list_available_schedules_intelligent(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(request): Json<IntelligentSearchRequest>,
) -> Result<Json<Vec<AvailableSchedule>>, ApiError> {
    request.validate()?;
    let integration = state.integration(integration_id).await?;
    Ok(Json(
        state
            .matrix
            .list_available_schedules_intelligent(&integration, &request.into())
            .await?,
    ))
}

pub async fn block_schedule(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(body): Json<BlockScheduleBody>,
) -> Result<Json<ScheduleBlock>, ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    Ok(Json(state.matrix.block_schedule(&integration, &body.into()).await?))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(body): Json<CreateScheduleBody>,
) -> Result<(StatusCode, Json<CreatedSchedule>), ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    let created = state.matrix.create_schedule(&integration, &body.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn cancel_schedule(
    State(state): State<AppState>,
    Path((integration_id, schedule_code)): Path<(Uuid, i64)>,
    body: Option<Json<CancelScheduleBody>>,
) -> Result<StatusCode, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    state
        .matrix
        .cancel_schedule(&integration, &body.into_request(schedule_code))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_schedule(
    State(state): State<AppState>,
    Path((integration_id, schedule_code)): Path<(Uuid, i64)>,
) -> Result<StatusCode, ApiError> {
    let integration = state.integration(integration_id).await?;
    state
        .matrix
        .confirm_schedule(&integration, &ConfirmScheduleRequest { schedule_code })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_patient(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(body): Json<PatientBody>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    let patient = state.matrix.create_patient(&integration, &body.into()).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path((integration_id, patient_code)): Path<(Uuid, i64)>,
    Json(body): Json<PatientBody>,
) -> Result<Json<Patient>, ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    Ok(Json(
        state
            .matrix
            .update_patient(&integration, patient_code, &body.into())
            .await?,
    ))
}

/// Looks a patient up; 404 when the upstream has no match
pub async fn find_patient(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(body): Json<PatientLookupBody>,
) -> Result<Json<Patient>, ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    state
        .matrix
        .find_patient(&integration, &body.into())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))
}

pub async fn list_patient_schedules(
    State(state): State<AppState>,
    Path((integration_id, patient_code)): Path<(Uuid, i64)>,
) -> Result<Json<Vec<PatientSchedule>>, ApiError> {
    let integration = state.integration(integration_id).await?;
    Ok(Json(
        state
            .matrix
            .list_patient_schedules(&integration, patient_code)
            .await?,
    ))
}

pub async fn recover_password(
    State(state): State<AppState>,
    Path(integration_id): Path<Uuid>,
    Json(body): Json<PasswordRecoveryBody>,
) -> Result<StatusCode, ApiError> {
    body.validate()?;
    let integration = state.integration(integration_id).await?;
    state.matrix.recover_password(&integration, &body.into()).await?;
    Ok(StatusCode::ACCEPTED)
}
