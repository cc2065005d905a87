use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, upsert_headers, SupabaseClient};

use crate::models::{
    AvailabilitySlot, BookedAppointment, DaySchedule, DoctorError, GenerateSlotsRequest,
    TickView, UpdateSlotRequest, UpdateSlotResponse,
};

pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Write one slot row per qualifying day of the range, all carrying the
    /// same window, duration and mode. Regeneration with identical inputs
    /// merges onto the existing `(doctor_id, date)` rows instead of failing,
    /// so the operation is idempotent. An empty range is not an error.
    pub async fn generate_slots(
        &self,
        doctor_id: &str,
        request: GenerateSlotsRequest,
        auth_token: &str,
    ) -> Result<Vec<AvailabilitySlot>, DoctorError> {
        if request.start_date > request.end_date {
            return Err(DoctorError::ValidationError(
                "start_date must not be after end_date".to_string(),
            ));
        }
        if request.start_time >= request.end_time {
            return Err(DoctorError::ValidationError(
                "start_time must be before end_time".to_string(),
            ));
        }
        if request.slot_duration_minutes == 0 {
            return Err(DoctorError::ValidationError(
                "slot_duration_minutes must be greater than zero".to_string(),
            ));
        }

        let days = qualifying_days(request.start_date, request.end_date, request.include_weekends);
        debug!(
            "Generating {} availability slots for doctor {} ({} to {})",
            days.len(),
            doctor_id,
            request.start_date,
            request.end_date
        );

        if days.is_empty() {
            return Ok(vec![]);
        }

        let now = Utc::now().to_rfc3339();
        let rows: Vec<Value> = days
            .into_iter()
            .map(|date| {
                json!({
                    "doctor_id": doctor_id,
                    "date": date.format("%Y-%m-%d").to_string(),
                    "start_time": request.start_time.format("%H:%M:%S").to_string(),
                    "end_time": request.end_time.format("%H:%M:%S").to_string(),
                    "slot_duration_minutes": request.slot_duration_minutes,
                    "mode": request.mode.as_str(),
                    "created_at": now,
                    "updated_at": now
                })
            })
            .collect();

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/availability_slots?on_conflict=doctor_id,date",
                Some(auth_token),
                Some(Value::Array(rows)),
                Some(upsert_headers()),
            )
            .await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilitySlot>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Slot rows for the management console, optionally bounded by date.
    pub async fn slots_for_range(
        &self,
        doctor_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<AvailabilitySlot>, DoctorError> {
        let mut path = format!(
            "/rest/v1/availability_slots?doctor_id=eq.{}&order=date.asc",
            doctor_id
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
            .collect::<Result<Vec<AvailabilitySlot>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// The booking view: that day's slot with its ticks materialized, each
    /// tick marked unavailable when an appointment already starts there.
    /// A day with no slot comes back with empty ticks rather than an error.
    pub async fn day_schedule(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<DaySchedule, DoctorError> {
        debug!("Computing day schedule for doctor {} on {}", doctor_id, date);

        let path = format!(
            "/rest/v1/availability_slots?doctor_id=eq.{}&date=eq.{}",
            doctor_id, date
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None, None).await?;

        let slot: Option<AvailabilitySlot> = match result.into_iter().next() {
            Some(row) => Some(
                serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?,
            ),
            None => None,
        };

        let ticks = match &slot {
            Some(slot) => {
                let booked = self.booked_appointments(doctor_id, date, None).await?;
                let taken: HashSet<NaiveTime> = booked.iter().map(|a| a.start_time).collect();

                slot.ticks()
                    .map(|start_time| TickView {
                        start_time,
                        available: !taken.contains(&start_time),
                    })
                    .collect()
            }
            None => vec![],
        };

        Ok(DaySchedule {
            doctor_id: doctor_id.to_string(),
            date,
            slot,
            ticks,
        })
    }

    /// Edit a slot in place. Bookings on that day whose start times are no
    /// longer valid ticks of the edited window are reported back, not
    /// blocked: the doctor sees the damage and resolves it.
    pub async fn update_slot(
        &self,
        doctor_id: &str,
        slot_id: &str,
        request: UpdateSlotRequest,
        auth_token: &str,
    ) -> Result<UpdateSlotResponse, DoctorError> {
        let path = format!(
            "/rest/v1/availability_slots?id=eq.{}&doctor_id=eq.{}",
            slot_id, doctor_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result.into_iter().next().ok_or(DoctorError::SlotNotFound)?;
        let current: AvailabilitySlot =
            serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        // Validate the merged window, not just the provided fields.
        let new_start = request.start_time.unwrap_or(current.start_time);
        let new_end = request.end_time.unwrap_or(current.end_time);
        if new_start >= new_end {
            return Err(DoctorError::ValidationError(
                "start_time must be before end_time".to_string(),
            ));
        }
        if request.slot_duration_minutes == Some(0) {
            return Err(DoctorError::ValidationError(
                "slot_duration_minutes must be greater than zero".to_string(),
            ));
        }

        let mut update_data = serde_json::Map::new();
        if let Some(start_time) = request.start_time {
            update_data.insert(
                "start_time".to_string(),
                json!(start_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(end_time) = request.end_time {
            update_data.insert(
                "end_time".to_string(),
                json!(end_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(duration) = request.slot_duration_minutes {
            update_data.insert("slot_duration_minutes".to_string(), json!(duration));
        }
        if let Some(mode) = request.mode {
            update_data.insert("mode".to_string(), json!(mode.as_str()));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

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

        let row = result.into_iter().next().ok_or(DoctorError::SlotNotFound)?;
        let updated: AvailabilitySlot =
            serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let booked = self
            .booked_appointments(doctor_id, updated.date, Some(auth_token))
            .await?;
        let valid_ticks: HashSet<NaiveTime> = updated.ticks().collect();
        let affected_appointments: Vec<BookedAppointment> = booked
            .into_iter()
            .filter(|appointment| !valid_ticks.contains(&appointment.start_time))
            .collect();

        if !affected_appointments.is_empty() {
            warn!(
                "Slot {} edit leaves {} booked appointments outside the new window",
                slot_id,
                affected_appointments.len()
            );
        }

        Ok(UpdateSlotResponse {
            slot: updated,
            affected_appointments,
        })
    }

    async fn booked_appointments(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<BookedAppointment>, DoctorError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&order=start_time.asc",
            doctor_id, date
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, auth_token, None).await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BookedAppointment>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}

/// Calendar days in `[start, end]` that get a slot. Saturday and Sunday are
/// skipped unless asked for.
fn qualifying_days(start: NaiveDate, end: NaiveDate, include_weekends: bool) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if include_weekends || !weekend {
            days.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifying_days_skip_weekends_by_default() {
        // 2025-06-02 is a Monday; the week through Sunday has 5 weekdays.
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();

        let days = qualifying_days(start, end, false);
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn qualifying_days_include_weekends_when_flagged() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();

        let days = qualifying_days(start, end, true);
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn qualifying_days_single_day_range() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert_eq!(qualifying_days(day, day, false), vec![day]);
    }

    #[test]
    fn qualifying_days_all_weekend_range_is_empty() {
        // Saturday and Sunday only.
        let start = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();

        assert!(qualifying_days(start, end, false).is_empty());
    }
}
