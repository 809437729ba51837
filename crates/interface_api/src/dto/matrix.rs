//! Matrix DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use domain_integration::adapters::matrix::{
    AvailableScheduleQuery, BlockScheduleRequest, CancelScheduleRequest, CreateScheduleRequest,
    DoctorFilter, IntelligentScheduleQuery, PasswordRecoveryRequest, PatientLookup, PatientRequest,
    ProcedureFilter,
};

#[derive(Debug, Default, Deserialize)]
pub struct DoctorQuery {
    pub unit_code: Option<i64>,
    pub speciality_code: Option<i64>,
}

impl From<DoctorQuery> for DoctorFilter {
    fn from(q: DoctorQuery) -> Self {
        DoctorFilter {
            unit_code: q.unit_code,
            speciality_code: q.speciality_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcedureQuery {
    pub speciality_code: Option<i64>,
    pub insurance_code: Option<i64>,
    pub plan_code: Option<i64>,
}

impl From<ProcedureQuery> for ProcedureFilter {
    fn from(q: ProcedureQuery) -> Self {
        ProcedureFilter {
            speciality_code: q.speciality_code,
            insurance_code: q.insurance_code,
            plan_code: q.plan_code,
        }
    }
}

fn validate_window(request: &ScheduleSearchRequest) -> Result<(), ValidationError> {
    if request.end_date < request.start_date {
        return Err(ValidationError::new("end_date_before_start_date"));
    }
    Ok(())
}

/// Slot search; `-1` codes mean "any"
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_window"))]
pub struct ScheduleSearchRequest {
    #[validate(range(min = 1))]
    pub unit_code: i64,
    #[validate(range(min = 1))]
    pub insurance_code: i64,
    pub plan_code: Option<i64>,
    pub speciality_code: Option<i64>,
    pub procedure_code: Option<i64>,
    pub doctor_code: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<ScheduleSearchRequest> for AvailableScheduleQuery {
    fn from(r: ScheduleSearchRequest) -> Self {
        AvailableScheduleQuery {
            unit_code: r.unit_code,
            insurance_code: r.insurance_code,
            plan_code: r.plan_code,
            speciality_code: r.speciality_code,
            procedure_code: r.procedure_code,
            doctor_code: r.doctor_code,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct IntelligentSearchRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub window: ScheduleSearchRequest,
    pub patient_code: Option<i64>,
    #[validate(length(min = 1, max = 20))]
    pub period: Option<String>,
}

impl From<IntelligentSearchRequest> for IntelligentScheduleQuery {
    fn from(r: IntelligentSearchRequest) -> Self {
        IntelligentScheduleQuery {
            window: r.window.into(),
            patient_code: r.patient_code,
            period: r.period,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlockScheduleBody {
    #[validate(range(min = 1))]
    pub unit_code: i64,
    #[validate(range(min = 1))]
    pub doctor_code: i64,
    pub date: NaiveDate,
    /// `HH:MM`
    #[validate(length(equal = 5))]
    pub time: String,
    pub procedure_code: Option<i64>,
}

impl From<BlockScheduleBody> for BlockScheduleRequest {
    fn from(b: BlockScheduleBody) -> Self {
        BlockScheduleRequest {
            unit_code: b.unit_code,
            doctor_code: b.doctor_code,
            date: b.date,
            time: b.time,
            procedure_code: b.procedure_code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateScheduleBody {
    #[validate(range(min = 1))]
    pub patient_code: i64,
    #[validate(range(min = 1))]
    pub unit_code: i64,
    #[validate(range(min = 1))]
    pub doctor_code: i64,
    #[validate(range(min = 1))]
    pub procedure_code: i64,
    #[validate(range(min = 1))]
    pub insurance_code: i64,
    pub plan_code: Option<i64>,
    pub date: NaiveDate,
    #[validate(length(equal = 5))]
    pub time: String,
    pub block_code: Option<i64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl From<CreateScheduleBody> for CreateScheduleRequest {
    fn from(b: CreateScheduleBody) -> Self {
        CreateScheduleRequest {
            patient_code: b.patient_code,
            unit_code: b.unit_code,
            doctor_code: b.doctor_code,
            procedure_code: b.procedure_code,
            insurance_code: b.insurance_code,
            plan_code: b.plan_code,
            date: b.date,
            time: b.time,
            block_code: b.block_code,
            notes: b.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatientBody {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Digits only
    #[validate(length(equal = 11))]
    pub cpf: String,
    pub birth_date: NaiveDate,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 20))]
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub insurance_code: Option<i64>,
}

impl From<PatientBody> for PatientRequest {
    fn from(b: PatientBody) -> Self {
        PatientRequest {
            name: b.name,
            cpf: b.cpf,
            birth_date: b.birth_date,
            email: b.email,
            phone: b.phone,
            sex: b.sex,
            insurance_code: b.insurance_code,
        }
    }
}

fn validate_lookup(body: &PatientLookupBody) -> Result<(), ValidationError> {
    if body.code.is_none() && body.cpf.is_none() && body.birth_date.is_none() {
        return Err(ValidationError::new("lookup_needs_one_criterion"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_lookup"))]
pub struct PatientLookupBody {
    pub code: Option<i64>,
    #[validate(length(equal = 11))]
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl From<PatientLookupBody> for PatientLookup {
    fn from(b: PatientLookupBody) -> Self {
        PatientLookup {
            code: b.code,
            cpf: b.cpf,
            birth_date: b.birth_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelScheduleBody {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl CancelScheduleBody {
    pub fn into_request(self, schedule_code: i64) -> CancelScheduleRequest {
        CancelScheduleRequest {
            schedule_code,
            reason: self.reason,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordRecoveryBody {
    #[validate(length(equal = 11))]
    pub cpf: String,
    #[validate(email)]
    pub email: Option<String>,
}

impl From<PasswordRecoveryBody> for PasswordRecoveryRequest {
    fn from(b: PasswordRecoveryBody) -> Self {
        PasswordRecoveryRequest {
            cpf: b.cpf,
            email: b.email,
        }
    }
}
