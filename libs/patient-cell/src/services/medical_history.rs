use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::error::StoreError;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{
    CreateHealthIssueRequest, HealthIssue, PatientError, UpdateHealthIssueRequest,
};

/// Medical history entries, one row per condition per patient. The store
/// carries a unique index on (patient_id, condition); the advisory lookup
/// here just turns the common duplicate into a friendly error before the
/// insert races.
pub struct MedicalHistoryService {
    supabase: SupabaseClient,
}

impl MedicalHistoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_issues(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<HealthIssue>, PatientError> {
        let path = format!(
            "/rest/v1/health_issues?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<HealthIssue>, _>>()
            .map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn add_issue(
        &self,
        patient_id: &str,
        request: CreateHealthIssueRequest,
        auth_token: &str,
    ) -> Result<HealthIssue, PatientError> {
        let condition = request.condition.trim().to_string();
        if condition.is_empty() {
            return Err(PatientError::ValidationError(
                "Condition is required".to_string(),
            ));
        }

        let check_path = format!(
            "/rest/v1/health_issues?patient_id=eq.{}&condition=eq.{}",
            patient_id,
            urlencoding::encode(&condition)
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &check_path, Some(auth_token), None)
            .await?;
        if !existing.is_empty() {
            return Err(PatientError::DuplicateCondition { condition });
        }

        debug!("Recording health issue for patient {}", patient_id);

        let now = Utc::now().to_rfc3339();
        let issue_data = json!({
            "patient_id": patient_id,
            "condition": condition,
            "diagnosed_on": request.diagnosed_on.map(|d| d.format("%Y-%m-%d").to_string()),
            "medications": request.medications,
            "notes": request.notes,
            "created_at": now,
            "updated_at": now
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/health_issues",
                Some(auth_token),
                Some(issue_data),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => PatientError::DuplicateCondition {
                    condition: condition.clone(),
                },
                other => PatientError::from(other),
            })?;

        let row = result.into_iter().next().ok_or_else(|| {
            PatientError::DatabaseError("Health issue insert returned no row".to_string())
        })?;
        serde_json::from_value(row).map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn update_issue(
        &self,
        patient_id: &str,
        issue_id: &str,
        request: UpdateHealthIssueRequest,
        auth_token: &str,
    ) -> Result<HealthIssue, PatientError> {
        let mut update_data = serde_json::Map::new();

        if let Some(condition) = &request.condition {
            if condition.trim().is_empty() {
                return Err(PatientError::ValidationError(
                    "Condition cannot be empty".to_string(),
                ));
            }
            update_data.insert("condition".to_string(), json!(condition.trim()));
        }
        if let Some(diagnosed_on) = request.diagnosed_on {
            update_data.insert(
                "diagnosed_on".to_string(),
                json!(diagnosed_on.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(medications) = request.medications {
            update_data.insert("medications".to_string(), json!(medications));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/health_issues?id=eq.{}&patient_id=eq.{}",
            issue_id, patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => PatientError::DuplicateCondition {
                    condition: request.condition.clone().unwrap_or_default(),
                },
                other => PatientError::from(other),
            })?;

        let row = result.into_iter().next().ok_or(PatientError::IssueNotFound)?;
        serde_json::from_value(row).map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn delete_issue(
        &self,
        patient_id: &str,
        issue_id: &str,
        auth_token: &str,
    ) -> Result<(), PatientError> {
        let path = format!(
            "/rest/v1/health_issues?id=eq.{}&patient_id=eq.{}",
            issue_id, patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(representation_headers()),
            )
            .await?;

        if result.is_empty() {
            return Err(PatientError::IssueNotFound);
        }

        debug!("Deleted health issue {}", issue_id);
        Ok(())
    }
}
