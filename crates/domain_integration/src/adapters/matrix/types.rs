//! Matrix API payloads
//!
//! Field names on the wire are the upstream's Portuguese names and are part
//! of the contract; Rust-side names are English. Optional request fields are
//! omitted when unset, and negative codes are stripped before sending (see
//! [`super::payload`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of the session login call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub login: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurance {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePlan {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
    /// Medical council registration
    #[serde(rename = "crm", default, skip_serializing_if = "Option::is_none")]
    pub council_number: Option<String>,
    #[serde(rename = "especialidades", default)]
    pub speciality_codes: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorFilter {
    #[serde(rename = "unidade", default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<i64>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub speciality_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speciality {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub speciality_code: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureFilter {
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub speciality_code: Option<i64>,
    #[serde(rename = "convenio", default, skip_serializing_if = "Option::is_none")]
    pub insurance_code: Option<i64>,
    #[serde(rename = "plano", default, skip_serializing_if = "Option::is_none")]
    pub plan_code: Option<i64>,
}

/// Search window for free slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableScheduleQuery {
    #[serde(rename = "unidade")]
    pub unit_code: i64,
    #[serde(rename = "convenio")]
    pub insurance_code: i64,
    #[serde(rename = "plano", default, skip_serializing_if = "Option::is_none")]
    pub plan_code: Option<i64>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub speciality_code: Option<i64>,
    #[serde(rename = "procedimento", default, skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<i64>,
    /// `-1` searches every doctor
    #[serde(rename = "medico", default, skip_serializing_if = "Option::is_none")]
    pub doctor_code: Option<i64>,
    #[serde(rename = "dataInicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "dataFim")]
    pub end_date: NaiveDate,
}

/// Search window for the upstream's "intelligent" slot suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligentScheduleQuery {
    #[serde(flatten)]
    pub window: AvailableScheduleQuery,
    #[serde(rename = "paciente", default, skip_serializing_if = "Option::is_none")]
    pub patient_code: Option<i64>,
    /// Preferred period of the day (`manha`, `tarde`, `noite`)
    #[serde(rename = "periodo", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSchedule {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "medico")]
    pub doctor_code: i64,
    #[serde(rename = "nomeMedico", default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "unidade")]
    pub unit_code: i64,
    #[serde(rename = "procedimento", default, skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<i64>,
}

/// Temporarily holds a slot while a booking is completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockScheduleRequest {
    #[serde(rename = "unidade")]
    pub unit_code: i64,
    #[serde(rename = "medico")]
    pub doctor_code: i64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "procedimento", default, skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    #[serde(rename = "codigoBloqueio")]
    pub block_code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    #[serde(rename = "paciente")]
    pub patient_code: i64,
    #[serde(rename = "unidade")]
    pub unit_code: i64,
    #[serde(rename = "medico")]
    pub doctor_code: i64,
    #[serde(rename = "procedimento")]
    pub procedure_code: i64,
    #[serde(rename = "convenio")]
    pub insurance_code: i64,
    #[serde(rename = "plano", default, skip_serializing_if = "Option::is_none")]
    pub plan_code: Option<i64>,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "codigoBloqueio", default, skip_serializing_if = "Option::is_none")]
    pub block_code: Option<i64>,
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSchedule {
    #[serde(rename = "codigoAgendamento")]
    pub schedule_code: i64,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "hora", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Patient registration data, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "sexo", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(rename = "convenio", default, skip_serializing_if = "Option::is_none")]
    pub insurance_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "dataNascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Patient search criteria; at least one field should be set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientLookup {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "dataNascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSchedule {
    #[serde(rename = "codigoAgendamento")]
    pub schedule_code: i64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "nomeMedico", default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "nomeUnidade", default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(rename = "nomeProcedimento", default, skip_serializing_if = "Option::is_none")]
    pub procedure_name: Option<String>,
    #[serde(rename = "situacao", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelScheduleRequest {
    #[serde(rename = "codigoAgendamento")]
    pub schedule_code: i64,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmScheduleRequest {
    #[serde(rename = "codigoAgendamento")]
    pub schedule_code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecoveryRequest {
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
