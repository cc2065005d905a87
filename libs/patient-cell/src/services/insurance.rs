use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{
    CreateInsurancePolicyRequest, InsurancePolicy, PatientError, UpdateInsurancePolicyRequest,
};

/// Insurance policies, always scoped to the requesting patient: every
/// query filters on `patient_id`, so a foreign policy id simply comes back
/// empty and reads as not found.
pub struct InsuranceService {
    supabase: SupabaseClient,
}

impl InsuranceService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_policies(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<InsurancePolicy>, PatientError> {
        let path = format!(
            "/rest/v1/insurance_policies?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InsurancePolicy>, _>>()
            .map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn create_policy(
        &self,
        patient_id: &str,
        request: CreateInsurancePolicyRequest,
        auth_token: &str,
    ) -> Result<InsurancePolicy, PatientError> {
        if request.provider.trim().is_empty() || request.policy_number.trim().is_empty() {
            return Err(PatientError::ValidationError(
                "Provider and policy number are required".to_string(),
            ));
        }

        debug!("Adding insurance policy for patient {}", patient_id);

        let now = Utc::now().to_rfc3339();
        let policy_data = json!({
            "patient_id": patient_id,
            "provider": request.provider,
            "policy_number": request.policy_number,
            "coverage_type": request.coverage_type,
            "valid_until": request.valid_until.format("%Y-%m-%d").to_string(),
            "created_at": now,
            "updated_at": now
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/insurance_policies",
                Some(auth_token),
                Some(policy_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result.into_iter().next().ok_or_else(|| {
            PatientError::DatabaseError("Policy insert returned no row".to_string())
        })?;
        serde_json::from_value(row).map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn update_policy(
        &self,
        patient_id: &str,
        policy_id: &str,
        request: UpdateInsurancePolicyRequest,
        auth_token: &str,
    ) -> Result<InsurancePolicy, PatientError> {
        let mut update_data = serde_json::Map::new();

        if let Some(provider) = request.provider {
            update_data.insert("provider".to_string(), json!(provider));
        }
        if let Some(policy_number) = request.policy_number {
            update_data.insert("policy_number".to_string(), json!(policy_number));
        }
        if let Some(coverage_type) = request.coverage_type {
            update_data.insert("coverage_type".to_string(), json!(coverage_type));
        }
        if let Some(valid_until) = request.valid_until {
            update_data.insert(
                "valid_until".to_string(),
                json!(valid_until.format("%Y-%m-%d").to_string()),
            );
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/insurance_policies?id=eq.{}&patient_id=eq.{}",
            policy_id, patient_id
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
            .await?;

        let row = result.into_iter().next().ok_or(PatientError::PolicyNotFound)?;
        serde_json::from_value(row).map_err(|e| PatientError::DatabaseError(e.to_string()))
    }

    pub async fn delete_policy(
        &self,
        patient_id: &str,
        policy_id: &str,
        auth_token: &str,
    ) -> Result<(), PatientError> {
        let path = format!(
            "/rest/v1/insurance_policies?id=eq.{}&patient_id=eq.{}",
            policy_id, patient_id
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
            return Err(PatientError::PolicyNotFound);
        }

        debug!("Deleted insurance policy {}", policy_id);
        Ok(())
    }
}
