use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_models::error::AppError;

/// A patient profile. The row id is the auth subject, so one user owns at
/// most one profile and ownership checks reduce to id equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardPatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider: String,
    pub policy_number: String,
    pub coverage_type: String,
    pub valid_until: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInsurancePolicyRequest {
    pub provider: String,
    pub policy_number: String,
    pub coverage_type: String,
    pub valid_until: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInsurancePolicyRequest {
    pub provider: Option<String>,
    pub policy_number: Option<String>,
    pub coverage_type: Option<String>,
    pub valid_until: Option<NaiveDate>,
}

/// One medical-history entry. `condition` is unique per patient; the store
/// index backs that up, the service gives the friendly error first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthIssue {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub condition: String,
    pub diagnosed_on: Option<NaiveDate>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthIssueRequest {
    pub condition: String,
    pub diagnosed_on: Option<NaiveDate>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHealthIssueRequest {
    pub condition: Option<String>,
    pub diagnosed_on: Option<NaiveDate>,
    pub medications: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient profile not found")]
    NotFound,

    #[error("Insurance policy not found")]
    PolicyNotFound,

    #[error("Medical history entry not found")]
    IssueNotFound,

    #[error("Patient profile already exists")]
    AlreadyExists,

    #[error("'{condition}' is already on this patient's record")]
    DuplicateCondition { condition: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for PatientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => PatientError::AlreadyExists,
            other => PatientError::DatabaseError(other.to_string()),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound
            | PatientError::PolicyNotFound
            | PatientError::IssueNotFound => AppError::NotFound(err.to_string()),
            PatientError::AlreadyExists | PatientError::DuplicateCondition { .. } => {
                AppError::Conflict(err.to_string())
            }
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
