use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use notification_cell::models::VerificationNotice;
use notification_cell::Notifier;
use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{
    Doctor, DoctorError, UploadDocumentsRequest, VerificationDecisionRequest, VerificationStatus,
};

const DOCUMENTS_BUCKET: &str = "verification-documents";

pub struct VerificationService {
    supabase: SupabaseClient,
    notifier: Notifier,
}

impl VerificationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            notifier: Notifier::new(config),
        }
    }

    /// Store the uploaded credential files and park the doctor back in
    /// `pending` for a fresh review. A re-upload replaces the previous
    /// document set wholesale.
    pub async fn submit_documents(
        &self,
        doctor_id: &str,
        request: UploadDocumentsRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        if request.documents.is_empty() {
            return Err(DoctorError::ValidationError(
                "At least one document is required".to_string(),
            ));
        }

        // Existence check up front so a bad id fails before any upload.
        self.fetch_doctor(doctor_id, auth_token).await?;

        let mut document_urls = Vec::with_capacity(request.documents.len());
        for document in &request.documents {
            // Accept both raw base64 and data-URL payloads.
            let encoded = match document.file_data.find(";base64,") {
                Some(idx) => &document.file_data[idx + 8..],
                None => document.file_data.as_str(),
            };
            let file_bytes = BASE64.decode(encoded).map_err(|_| {
                DoctorError::ValidationError(format!(
                    "Document '{}' is not valid base64",
                    document.file_name
                ))
            })?;

            let extension = document.file_name.rsplit('.').next().unwrap_or("bin");
            let object_path = format!("{}/{}.{}", doctor_id, Uuid::new_v4(), extension);

            debug!(
                "Uploading verification document '{}' for doctor {}",
                document.file_name, doctor_id
            );
            let _: Value = self
                .supabase
                .request(
                    Method::POST,
                    &format!("/storage/v1/object/{}/{}", DOCUMENTS_BUCKET, object_path),
                    Some(auth_token),
                    Some(json!({
                        "data": file_bytes,
                        "contentType": document.content_type
                    })),
                )
                .await?;

            document_urls.push(self.supabase.get_public_url(&format!(
                "/storage/v1/object/public/{}/{}",
                DOCUMENTS_BUCKET, object_path
            )));
        }

        let update_data = json!({
            "verification_documents": document_urls,
            "verification_status": VerificationStatus::Pending.as_str(),
            "updated_at": chrono::Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/doctors?id=eq.{}", doctor_id),
                Some(auth_token),
                Some(update_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;
        let updated: Doctor =
            serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!(
            "Doctor {} submitted {} verification documents",
            doctor_id,
            updated.verification_documents.len()
        );
        self.notifier
            .documents_submitted(&updated.full_name(), &updated.email)
            .await;

        Ok(updated)
    }

    /// Resolve a pending review. Deciding an already decided doctor is
    /// rejected so repeated admin clicks cannot flip a status or re-send
    /// the outcome mail.
    pub async fn decide(
        &self,
        doctor_id: &str,
        request: VerificationDecisionRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        let doctor = self.fetch_doctor(doctor_id, auth_token).await?;

        if doctor.verification_status != VerificationStatus::Pending {
            return Err(DoctorError::ValidationError(format!(
                "Doctor verification already {}",
                doctor.verification_status.as_str()
            )));
        }

        let new_status = if request.approved {
            VerificationStatus::Approved
        } else {
            VerificationStatus::Rejected
        };

        let update_data = json!({
            "verification_status": new_status.as_str(),
            "updated_at": chrono::Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/doctors?id=eq.{}", doctor_id),
                Some(auth_token),
                Some(update_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;
        let updated: Doctor =
            serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!(
            "Doctor {} verification decided: {}",
            doctor_id,
            updated.verification_status.as_str()
        );
        self.notifier
            .verification_decided(&VerificationNotice {
                doctor_name: updated.full_name(),
                doctor_email: updated.email.clone(),
                approved: request.approved,
            })
            .await;

        Ok(updated)
    }

    async fn fetch_doctor(&self, doctor_id: &str, auth_token: &str) -> Result<Doctor, DoctorError> {
        let result: Vec<Value> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/doctors?id=eq.{}", doctor_id),
                Some(auth_token),
                None,
            )
            .await?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;
        serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}
