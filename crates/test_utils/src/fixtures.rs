//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for integrations, credential bundles and
//! Matrix payloads. These fixtures are consistent and predictable so tests
//! can assert on exact wire values.

use chrono::NaiveDate;
use serde_json::{json, Value};

use core_kernel::TenantId;
use domain_integration::adapters::matrix::{
    AvailableScheduleQuery, BlockScheduleRequest, CancelScheduleRequest, CreateScheduleRequest,
    IntelligentScheduleQuery, PatientLookup, PatientRequest,
};
use domain_integration::{IntegrationEnvironment, IntegrationRecord};

/// Credentials reference used by the default fixtures
pub const CLINIC_CREDENTIALS_REF: &str = "clinic-centro";

/// Static API token used by the default fixtures
pub const STATIC_TOKEN: &str = "static-api-token";

pub const SESSION_USERNAME: &str = "integracao";
pub const SESSION_PASSWORD: &str = "s3nha-forte";

/// Fixture for integration records
pub struct IntegrationFixtures;

impl IntegrationFixtures {
    /// Production Matrix integration using [`CLINIC_CREDENTIALS_REF`]
    pub fn production() -> IntegrationRecord {
        IntegrationRecord::matrix(TenantId::new(), CLINIC_CREDENTIALS_REF)
    }

    /// Matrix integration pointed at the upstream test environment
    pub fn test_environment() -> IntegrationRecord {
        Self::production().with_environment(IntegrationEnvironment::Test)
    }
}

/// Fixture for credential bundles
pub struct CredentialFixtures;

impl CredentialFixtures {
    /// Environment entry with static token and session login
    pub fn matrix_entry(api_url: &str) -> Value {
        json!({
            "apiUrl": api_url,
            "apiToken": STATIC_TOKEN,
            "username": SESSION_USERNAME,
            "password": SESSION_PASSWORD
        })
    }

    /// Bundle with identical entries for both environments
    pub fn matrix_bundle(api_url: &str) -> Value {
        json!({
            "production": Self::matrix_entry(api_url),
            "test": Self::matrix_entry(api_url)
        })
    }

    /// Bundle whose entries lack `apiToken`
    pub fn bundle_without_token(api_url: &str) -> Value {
        let entry = json!({ "apiUrl": api_url });
        json!({ "production": entry.clone(), "test": entry })
    }

    /// Bundle whose entries have no session login
    pub fn bundle_without_login(api_url: &str) -> Value {
        let entry = json!({ "apiUrl": api_url, "apiToken": STATIC_TOKEN });
        json!({ "production": entry.clone(), "test": entry })
    }
}

/// Fixture for Matrix request payloads
pub struct PayloadFixtures;

impl PayloadFixtures {
    pub fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    pub fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
    }

    /// Slot search for any doctor (`medico = -1`)
    pub fn available_schedule_query() -> AvailableScheduleQuery {
        AvailableScheduleQuery {
            unit_code: 1,
            insurance_code: 20,
            plan_code: Some(201),
            speciality_code: Some(5),
            procedure_code: Some(300),
            doctor_code: Some(-1),
            start_date: Self::start_date(),
            end_date: Self::end_date(),
        }
    }

    pub fn intelligent_schedule_query() -> IntelligentScheduleQuery {
        IntelligentScheduleQuery {
            window: Self::available_schedule_query(),
            patient_code: Some(4512),
            period: Some("manha".to_string()),
        }
    }

    pub fn block_schedule_request() -> BlockScheduleRequest {
        BlockScheduleRequest {
            unit_code: 1,
            doctor_code: 77,
            date: Self::start_date(),
            time: "09:30".to_string(),
            procedure_code: Some(300),
        }
    }

    pub fn create_schedule_request() -> CreateScheduleRequest {
        CreateScheduleRequest {
            patient_code: 4512,
            unit_code: 1,
            doctor_code: 77,
            procedure_code: 300,
            insurance_code: 20,
            plan_code: Some(-1),
            date: Self::start_date(),
            time: "09:30".to_string(),
            block_code: Some(991),
            notes: None,
        }
    }

    pub fn patient_request() -> PatientRequest {
        PatientRequest {
            name: "Maria da Silva".to_string(),
            cpf: "12345678909".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 7, 12).unwrap(),
            email: Some("maria@example.com".to_string()),
            phone: Some("11999990000".to_string()),
            sex: Some("F".to_string()),
            insurance_code: Some(20),
        }
    }

    pub fn patient_lookup() -> PatientLookup {
        PatientLookup {
            code: None,
            cpf: Some("12345678909".to_string()),
            birth_date: Some(NaiveDate::from_ymd_opt(1985, 7, 12).unwrap()),
        }
    }

    pub fn cancel_schedule_request() -> CancelScheduleRequest {
        CancelScheduleRequest {
            schedule_code: 8801,
            reason: Some("Paciente desistiu".to_string()),
        }
    }

    /// Matrix JSON for one patient
    pub fn patient_json(code: i64) -> Value {
        json!({
            "codigo": code,
            "nome": "Maria da Silva",
            "cpf": "12345678909",
            "dataNascimento": "1985-07-12"
        })
    }
}
