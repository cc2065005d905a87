use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{Appointment, AppointmentError, DashboardSummary};

pub struct DashboardService {
    supabase: SupabaseClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// One landing-screen payload per role: appointment counts and the
    /// upcoming list for everyone, plus the verification status when the
    /// caller is a doctor.
    pub async fn summary(
        &self,
        user: &User,
        auth_token: &str,
    ) -> Result<DashboardSummary, AppointmentError> {
        let role = user.role.clone().unwrap_or_else(|| "patient".to_string());
        debug!("Building dashboard for {} ({})", user.id, role);

        let filter = if role == "doctor" {
            format!("doctor_id=eq.{}", user.id)
        } else {
            format!("patient_id=eq.{}", user.id)
        };

        let path = format!(
            "/rest/v1/appointments?{}&order=date.asc,start_time.asc",
            filter
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let appointments: Vec<Appointment> = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let today = Utc::now().date_naive();
        let upcoming_appointments: Vec<Appointment> = appointments
            .iter()
            .filter(|appointment| appointment.date >= today)
            .cloned()
            .collect();

        let verification_status = if role == "doctor" {
            self.doctor_verification_status(&user.id, auth_token).await?
        } else {
            None
        };

        Ok(DashboardSummary {
            role,
            total_appointments: appointments.len(),
            upcoming_count: upcoming_appointments.len(),
            upcoming_appointments,
            verification_status,
        })
    }

    async fn doctor_verification_status(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Option<String>, AppointmentError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(result.into_iter().next().and_then(|row| {
            row.get("verification_status")
                .and_then(Value::as_str)
                .map(String::from)
        }))
    }
}
