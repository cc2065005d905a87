use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};
use shared_models::auth::User;

use crate::models::{Doctor, DoctorError, OnboardDoctorRequest, UpdateDoctorRequest};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create the doctor profile for the authenticated user. The row id is
    /// the auth subject, so one user owns at most one profile.
    pub async fn onboard_doctor(
        &self,
        user: &User,
        request: OnboardDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        let email = user
            .email
            .clone()
            .ok_or_else(|| DoctorError::ValidationError("Authenticated user has no email".to_string()))?;

        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(DoctorError::ValidationError("First and last name are required".to_string()));
        }
        if request.specialty.trim().is_empty() {
            return Err(DoctorError::ValidationError("Specialty is required".to_string()));
        }

        debug!("Creating doctor profile for: {}", email);

        let existing_path = format!(
            "/rest/v1/doctors?or=(id.eq.{},email.eq.{})",
            user.id,
            urlencoding::encode(&email)
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &existing_path, Some(auth_token), None)
            .await?;

        if !existing.is_empty() {
            return Err(DoctorError::AlreadyExists);
        }

        let doctor_data = json!({
            "id": user.id,
            "first_name": request.first_name,
            "last_name": request.last_name,
            "email": email,
            "specialty": request.specialty,
            "license_number": request.license_number,
            "bio": request.bio,
            "verification_status": "pending",
            "verification_documents": [],
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        // The store's unique indexes on id and email are what actually hold
        // the line; the pre-check above only gives a friendlier early error.
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/doctors",
                Some(auth_token),
                Some(doctor_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::DatabaseError("Doctor insert returned no row".to_string()))?;
        let doctor: Doctor =
            serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        debug!("Doctor profile created with ID: {}", doctor.id);
        Ok(doctor)
    }

    pub async fn get_doctor(
        &self,
        doctor_id: &str,
        auth_token: Option<&str>,
    ) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;
        serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Partial update of the caller's own profile; omitted fields stay put.
    pub async fn update_doctor(
        &self,
        doctor_id: &str,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor profile: {}", doctor_id);

        let mut update_data = serde_json::Map::new();

        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(specialty) = request.specialty {
            update_data.insert("specialty".to_string(), json!(specialty));
        }
        if let Some(license_number) = request.license_number {
            update_data.insert("license_number".to_string(), json!(license_number));
        }
        if let Some(bio) = request.bio {
            update_data.insert("bio".to_string(), json!(bio));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
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

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;
        serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Public directory search. Only approved doctors are listed.
    pub async fn search_doctors(
        &self,
        specialty: Option<String>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Searching doctors, specialty filter: {:?}", specialty);

        let mut query_parts = vec!["verification_status=eq.approved".to_string()];
        if let Some(specialty) = specialty {
            query_parts.push(format!("specialty=ilike.%{}%", urlencoding::encode(&specialty)));
        }

        let mut path = format!("/rest/v1/doctors?{}", query_parts.join("&"));
        path.push_str("&order=last_name.asc,first_name.asc");
        path.push_str(&format!("&limit={}", limit.unwrap_or(50)));
        path.push_str(&format!("&offset={}", offset.unwrap_or(0)));

        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None, None).await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Full roster with verification status, for the admin review queue.
    pub async fn list_doctors(&self, auth_token: &str) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing all doctors for review");

        let path = "/rest/v1/doctors?order=created_at.desc";
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}
