use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use notification_cell::models::BookingNotice;
use notification_cell::Notifier;
use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};
use shared_models::auth::User;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, DoctorContact,
    RescheduleAppointmentRequest, APPOINTMENT_MODES,
};

enum BookingEvent {
    Rescheduled,
    Cancelled,
}

pub struct BookingService {
    supabase: SupabaseClient,
    notifier: Notifier,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            notifier: Notifier::new(config),
        }
    }

    /// Book a tick with the caller's verified identity cached on the row.
    /// The advisory read gives the friendly error on the common path; the
    /// store's unique index on `(doctor_id, date, start_time)` is what
    /// actually guarantees no double booking when two racers pass it.
    pub async fn book_appointment(
        &self,
        user: &User,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let patient_name = user
            .full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                AppointmentError::ValidationError("Patient name missing from token".to_string())
            })?;
        let patient_email = user
            .email
            .clone()
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| {
                AppointmentError::ValidationError("Patient email missing from token".to_string())
            })?;

        if request.reason.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "A reason for the visit is required".to_string(),
            ));
        }
        if let Some(mode) = &request.mode {
            if !APPOINTMENT_MODES.contains(&mode.as_str()) {
                return Err(AppointmentError::ValidationError(format!(
                    "Unknown appointment mode '{}'",
                    mode
                )));
            }
        }

        let doctor = self.fetch_doctor_contact(&request.doctor_id, auth_token).await?;

        debug!(
            "Booking request for doctor {} on {} at {}",
            doctor.id, request.date, request.start_time
        );

        let conflict_path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&start_time=eq.{}",
            request.doctor_id, request.date, request.start_time
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &conflict_path, Some(auth_token), None)
            .await?;
        if !existing.is_empty() {
            return Err(AppointmentError::SlotTaken);
        }

        let now = Utc::now().to_rfc3339();
        let appointment_data = json!({
            "doctor_id": request.doctor_id,
            "patient_id": user.id,
            "date": request.date.format("%Y-%m-%d").to_string(),
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "reason": request.reason,
            "patient_name": patient_name,
            "patient_email": patient_email,
            "mode": request.mode,
            "booking_date": now,
            "created_at": now,
            "updated_at": now
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(appointment_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result.into_iter().next().ok_or_else(|| {
            AppointmentError::DatabaseError("Appointment insert returned no row".to_string())
        })?;
        let appointment: Appointment = serde_json::from_value(row)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!(
            "Appointment {} booked for doctor {} on {} at {}",
            appointment.id, appointment.doctor_id, appointment.date, appointment.start_time
        );
        self.notifier
            .booking_created(&Self::notice(&doctor, &appointment))
            .await;

        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// The caller's appointments: a doctor sees their calendar, everyone
    /// else sees what they booked.
    pub async fn list_appointments(
        &self,
        user: &User,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let filter = if user.role.as_deref() == Some("doctor") {
            format!("doctor_id=eq.{}", user.id)
        } else {
            format!("patient_id=eq.{}", user.id)
        };

        let mut path = format!(
            "/rest/v1/appointments?{}&order=date.asc,start_time.asc",
            filter
        );
        if let Some(from) = from {
            path.push_str(&format!("&date=gte.{}", from));
        }
        if let Some(to) = to {
            path.push_str(&format!("&date=lte.{}", to));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// Move or annotate an existing booking. There is no advisory re-check
    /// here; a move onto an occupied tick is caught by the store's unique
    /// index and surfaces as `SlotTaken`.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        user: &User,
        request: RescheduleAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;
        Self::authorize(&appointment, user)?;

        if let Some(reason) = &request.reason {
            if reason.trim().is_empty() {
                return Err(AppointmentError::ValidationError(
                    "A reason for the visit is required".to_string(),
                ));
            }
        }

        let mut update_data = serde_json::Map::new();
        if let Some(date) = request.date {
            update_data.insert("date".to_string(), json!(date.format("%Y-%m-%d").to_string()));
        }
        if let Some(start_time) = request.start_time {
            update_data.insert(
                "start_time".to_string(),
                json!(start_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(reason) = request.reason {
            update_data.insert("reason".to_string(), json!(reason));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        let updated: Appointment = serde_json::from_value(row)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!(
            "Appointment {} rescheduled to {} at {}",
            updated.id, updated.date, updated.start_time
        );
        self.notify_with_doctor(&updated, auth_token, BookingEvent::Rescheduled)
            .await;

        Ok(updated)
    }

    /// Remove a booking outright. The freed tick becomes bookable again
    /// the moment the row is gone.
    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        user: &User,
        auth_token: &str,
    ) -> Result<(), AppointmentError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;
        Self::authorize(&appointment, user)?;

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let _: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(representation_headers()),
            )
            .await?;

        info!("Appointment {} cancelled", appointment_id);
        self.notify_with_doctor(&appointment, auth_token, BookingEvent::Cancelled)
            .await;

        Ok(())
    }

    async fn fetch_doctor_contact(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<DoctorContact, AppointmentError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result.into_iter().next().ok_or(AppointmentError::DoctorNotFound)?;
        serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// Notification sends never fail the operation, including when the
    /// doctor row backing the notice cannot be read.
    async fn notify_with_doctor(
        &self,
        appointment: &Appointment,
        auth_token: &str,
        event: BookingEvent,
    ) {
        match self
            .fetch_doctor_contact(&appointment.doctor_id.to_string(), auth_token)
            .await
        {
            Ok(doctor) => {
                let notice = Self::notice(&doctor, appointment);
                match event {
                    BookingEvent::Rescheduled => self.notifier.booking_rescheduled(&notice).await,
                    BookingEvent::Cancelled => self.notifier.booking_cancelled(&notice).await,
                }
            }
            Err(e) => warn!(
                "Skipping notification for appointment {}: {}",
                appointment.id, e
            ),
        }
    }

    fn notice(doctor: &DoctorContact, appointment: &Appointment) -> BookingNotice {
        BookingNotice {
            doctor_name: doctor.full_name(),
            doctor_email: doctor.email.clone(),
            patient_name: appointment.patient_name.clone(),
            patient_email: appointment.patient_email.clone(),
            date: appointment.date,
            start_time: appointment.start_time,
            reason: appointment.reason.clone(),
        }
    }

    fn authorize(appointment: &Appointment, user: &User) -> Result<(), AppointmentError> {
        let is_booking_patient =
            user.email.as_deref() == Some(appointment.patient_email.as_str());
        let is_owning_doctor = user.id == appointment.doctor_id.to_string();

        if is_booking_patient || is_owning_doctor {
            Ok(())
        } else {
            Err(AppointmentError::Unauthorized)
        }
    }
}
