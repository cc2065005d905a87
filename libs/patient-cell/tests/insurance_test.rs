// libs/patient-cell/tests/insurance_test.rs
//
// Insurance policies are always queried through the owner's patient_id
// filter, so records belonging to someone else read back as not found.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{
    CreateInsurancePolicyRequest, PatientError, UpdateInsurancePolicyRequest,
};
use patient_cell::services::InsuranceService;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn service(mock_server: &MockServer) -> InsuranceService {
    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };
    InsuranceService::new(&test_config.to_app_config())
}

fn create_request() -> CreateInsurancePolicyRequest {
    CreateInsurancePolicyRequest {
        provider: "Acme Health".to_string(),
        policy_number: "POL-0042".to_string(),
        coverage_type: "full".to_string(),
        valid_until: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
    }
}

#[tokio::test]
async fn list_policies_scopes_to_owner() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/insurance_policies"))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::insurance_response(&policy_id, &patient_id, "Acme Health"),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let policies = service(&mock_server)
        .list_policies(&patient_id, "patient-token")
        .await
        .unwrap();

    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].provider, "Acme Health");
}

#[tokio::test]
async fn create_policy_inserts_owned_row() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/insurance_policies"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(serde_json::json!({
            "patient_id": patient_id,
            "provider": "Acme Health",
            "policy_number": "POL-0042",
            "valid_until": "2027-01-01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![
            MockSupabaseResponses::insurance_response(&policy_id, &patient_id, "Acme Health"),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let policy = service(&mock_server)
        .create_policy(&patient_id, create_request(), "patient-token")
        .await
        .unwrap();

    assert_eq!(policy.id.to_string(), policy_id);
    assert_eq!(policy.policy_number, "POL-0042");
}

#[tokio::test]
async fn create_policy_requires_provider_and_number() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/insurance_policies"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut request = create_request();
    request.policy_number = "  ".to_string();

    let result = service(&mock_server)
        .create_policy(&patient_id, request, "patient-token")
        .await;

    assert_matches!(result, Err(PatientError::ValidationError(_)));
}

#[tokio::test]
async fn update_policy_patches_through_owner_filter() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/insurance_policies"))
        .and(query_param("id", format!("eq.{}", policy_id)))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(body_partial_json(serde_json::json!({
            "coverage_type": "dental"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::insurance_response(&policy_id, &patient_id, "Acme Health"),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .update_policy(
            &patient_id,
            &policy_id,
            UpdateInsurancePolicyRequest {
                provider: None,
                policy_number: None,
                coverage_type: Some("dental".to_string()),
                valid_until: None,
            },
            "patient-token",
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn update_foreign_policy_is_not_found() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    // Filtered PATCH touches nothing when the row belongs to someone else.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/insurance_policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .update_policy(
            &patient_id,
            &policy_id,
            UpdateInsurancePolicyRequest {
                provider: Some("Other Mutual".to_string()),
                policy_number: None,
                coverage_type: None,
                valid_until: None,
            },
            "patient-token",
        )
        .await;

    assert_matches!(result, Err(PatientError::PolicyNotFound));
}

#[tokio::test]
async fn delete_policy_removes_owned_row() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/insurance_policies"))
        .and(query_param("id", format!("eq.{}", policy_id)))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::insurance_response(&policy_id, &patient_id, "Acme Health"),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .delete_policy(&patient_id, &policy_id, "patient-token")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_unknown_policy_is_not_found() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let policy_id = Uuid::new_v4().to_string();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/insurance_policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .delete_policy(&patient_id, &policy_id, "patient-token")
        .await;

    assert_matches!(result, Err(PatientError::PolicyNotFound));
}
