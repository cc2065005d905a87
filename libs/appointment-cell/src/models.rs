use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_models::error::AppError;

/// A booked tick. `patient_name` and `patient_email` are cached from the
/// booker's verified identity so listings and notifications never need a
/// patient-profile join; the store enforces one row per
/// `(doctor_id, date, start_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub reason: String,
    pub patient_name: String,
    pub patient_email: String,
    pub mode: Option<String>,
    pub booking_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub reason: String,
    pub mode: Option<String>,
}

/// Only provided fields move; everything else stays as booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

/// Doctor fields this cell needs for existence checks and notices.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorContact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl DoctorContact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Role-aware summary for the landing screen. `verification_status` is
/// only present for doctors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub role: String,
    pub total_appointments: usize,
    pub upcoming_count: usize,
    pub upcoming_appointments: Vec<Appointment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
}

pub const APPOINTMENT_MODES: [&str; 3] = ["in_person", "virtual", "both"];

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("That time slot is already booked")]
    SlotTaken,

    #[error("Not authorized for this appointment")]
    Unauthorized,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            // Unique-index hit on (doctor_id, date, start_time).
            StoreError::Conflict(_) => AppointmentError::SlotTaken,
            other => AppointmentError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::Unauthorized => AppError::Auth(err.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
