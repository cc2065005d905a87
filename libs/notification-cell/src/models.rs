use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

/// Everything the mail templates need about a booking event. Callers fill
/// this from their own records so this cell stays free of store lookups.
#[derive(Debug, Clone, Serialize)]
pub struct BookingNotice {
    pub doctor_name: String,
    pub doctor_email: String,
    pub patient_name: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationNotice {
    pub doctor_name: String,
    pub doctor_email: String,
    pub approved: bool,
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Mail API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail delivery not configured")]
    NotConfigured,
}
