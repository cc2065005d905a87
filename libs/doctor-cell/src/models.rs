use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_models::error::AppError;

/// Admin-reviewed credential state. `Pending` is the initial state and the
/// only one an admin decision may transition away from; a document re-upload
/// always returns the doctor to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMode {
    InPerson,
    Virtual,
    Both,
}

impl SlotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotMode::InPerson => "in_person",
            SlotMode::Virtual => "virtual",
            SlotMode::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: String,
    pub license_number: Option<String>,
    pub bio: Option<String>,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub verification_documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A doctor-declared window of bookable time on one calendar date.
/// `start_time < end_time` and `slot_duration_minutes > 0` are enforced on
/// every write; the store holds at most one row per `(doctor_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
    pub mode: SlotMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// Bookable start times of this slot, in order: `start_time` inclusive,
    /// stepping by the slot duration, stopping before any tick whose end
    /// would pass `end_time`. A trailing partial increment is dropped. Pure
    /// function of the slot, so callers may restart it freely.
    pub fn ticks(&self) -> impl Iterator<Item = NaiveTime> {
        let step = Duration::minutes(i64::from(self.slot_duration_minutes));
        let end = self.end_time;
        // A zero-minute step would never advance; yield nothing instead.
        let first = (self.slot_duration_minutes > 0).then_some(self.start_time);

        std::iter::successors(first, move |current| {
            let (next, wrapped) = current.overflowing_add_signed(step);
            (wrapped == 0).then_some(next)
        })
        .take_while(move |tick| {
            let (tick_end, wrapped) = tick.overflowing_add_signed(step);
            wrapped == 0 && tick_end <= end
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub license_number: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
    pub mode: SlotMode,
    #[serde(default)]
    pub include_weekends: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub slot_duration_minutes: Option<u32>,
    pub mode: Option<SlotMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    /// Raw base64 or a full `data:` URI; anything before `;base64,` is ignored.
    pub file_data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocumentsRequest {
    pub documents: Vec<DocumentUpload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationDecisionRequest {
    pub approved: bool,
}

/// One bookable tick of a day schedule, marked taken when an appointment
/// already starts there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickView {
    pub start_time: NaiveTime,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub slot: Option<AvailabilitySlot>,
    pub ticks: Vec<TickView>,
}

/// Appointment fields this cell reads back when marking taken ticks and
/// reporting bookings stranded by a slot edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub patient_name: String,
}

/// Result of an in-place slot edit. The edit is applied even when bookings
/// fall outside the new window; they are reported here for the caller to
/// resolve, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotResponse {
    pub slot: AvailabilitySlot,
    pub affected_appointments: Vec<BookedAppointment>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Availability slot not found")]
    SlotNotFound,

    #[error("Doctor profile already exists")]
    AlreadyExists,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for DoctorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => DoctorError::AlreadyExists,
            other => DoctorError::DatabaseError(other.to_string()),
        }
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound | DoctorError::SlotNotFound => AppError::NotFound(err.to_string()),
            DoctorError::AlreadyExists => AppError::Conflict(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
