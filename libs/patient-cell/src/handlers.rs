use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use std::sync::Arc;
use tracing::info;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::{
    CreateHealthIssueRequest, CreateInsurancePolicyRequest, OnboardPatientRequest,
    UpdateHealthIssueRequest, UpdateInsurancePolicyRequest, UpdatePatientRequest,
};
use crate::services::{InsuranceService, MedicalHistoryService, PatientService};

// ===== PROFILE HANDLERS =====

/// POST /api/onboarding/patient - create the caller's patient profile
pub async fn onboard_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<OnboardPatientRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    info!("Patient onboarding request from user {}", user.id);
    let patient_service = PatientService::new(&config);
    let patient = patient_service
        .onboard_patient(&user, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// PUT /api/profile/patient - update the caller's patient profile
pub async fn update_patient_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    let patient_service = PatientService::new(&config);
    let patient = patient_service
        .update_patient(&user.id, request, auth.token())
        .await?;
    Ok(Json(patient))
}

// ===== INSURANCE HANDLERS =====

/// GET /api/insurance - the caller's policies, newest first
pub async fn list_insurance_policies(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let insurance_service = InsuranceService::new(&config);
    let policies = insurance_service
        .list_policies(&user.id, auth.token())
        .await?;
    Ok(Json(policies))
}

/// POST /api/insurance - add a policy for the caller
pub async fn create_insurance_policy(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateInsurancePolicyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let insurance_service = InsuranceService::new(&config);
    let policy = insurance_service
        .create_policy(&user.id, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(policy)))
}

/// PUT /api/insurance/{policy_id} - edit one of the caller's policies
pub async fn update_insurance_policy(
    State(config): State<Arc<AppConfig>>,
    Path(policy_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateInsurancePolicyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let insurance_service = InsuranceService::new(&config);
    let policy = insurance_service
        .update_policy(&user.id, &policy_id, request, auth.token())
        .await?;
    Ok(Json(policy))
}

/// DELETE /api/insurance/{policy_id} - remove one of the caller's policies
pub async fn delete_insurance_policy(
    State(config): State<Arc<AppConfig>>,
    Path(policy_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let insurance_service = InsuranceService::new(&config);
    insurance_service
        .delete_policy(&user.id, &policy_id, auth.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== MEDICAL HISTORY HANDLERS =====

/// GET /api/medical-history - the caller's recorded conditions
pub async fn list_health_issues(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let history_service = MedicalHistoryService::new(&config);
    let issues = history_service.list_issues(&user.id, auth.token()).await?;
    Ok(Json(issues))
}

/// POST /api/medical-history - record a condition for the caller
pub async fn add_health_issue(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateHealthIssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let history_service = MedicalHistoryService::new(&config);
    let issue = history_service
        .add_issue(&user.id, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// PUT /api/medical-history/{issue_id} - edit one of the caller's entries
pub async fn update_health_issue(
    State(config): State<Arc<AppConfig>>,
    Path(issue_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateHealthIssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let history_service = MedicalHistoryService::new(&config);
    let issue = history_service
        .update_issue(&user.id, &issue_id, request, auth.token())
        .await?;
    Ok(Json(issue))
}

/// DELETE /api/medical-history/{issue_id} - remove one of the caller's entries
pub async fn delete_health_issue(
    State(config): State<Arc<AppConfig>>,
    Path(issue_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let history_service = MedicalHistoryService::new(&config);
    history_service
        .delete_issue(&user.id, &issue_id, auth.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
