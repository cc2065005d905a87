use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::{
    GenerateSlotsRequest, OnboardDoctorRequest, UpdateDoctorRequest, UpdateSlotRequest,
    UploadDocumentsRequest, VerificationDecisionRequest,
};
use crate::services::{AvailabilityService, DoctorService, VerificationService};

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub specialty: Option<String>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SlotRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// ===== PUBLIC HANDLERS =====

/// GET /api/doctors/search - browse approved doctors, optionally by specialty
pub async fn search_doctors(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<DoctorSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let doctor_service = DoctorService::new(&config);
    let doctors = doctor_service
        .search_doctors(params.specialty, params.limit, params.offset)
        .await?;
    Ok(Json(doctors))
}

/// GET /api/doctors/{doctor_id} - public doctor profile
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    let doctor_service = DoctorService::new(&config);
    let doctor = doctor_service.get_doctor(&doctor_id, None).await?;
    Ok(Json(doctor))
}

/// GET /api/doctors/{doctor_id}/slots?date= - bookable ticks for one day
pub async fn get_day_schedule(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(params): Query<ScheduleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let availability_service = AvailabilityService::new(&config);
    let schedule = availability_service
        .day_schedule(&doctor_id, params.date)
        .await?;
    Ok(Json(schedule))
}

// ===== PROTECTED HANDLERS =====

/// POST /api/onboarding/doctor - create the caller's doctor profile
pub async fn onboard_doctor(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<OnboardDoctorRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    info!("Doctor onboarding request from user {}", user.id);
    let doctor_service = DoctorService::new(&config);
    let doctor = doctor_service
        .onboard_doctor(&user, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// PUT /api/profile/doctor - update the caller's doctor profile
pub async fn update_doctor_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let doctor_service = DoctorService::new(&config);
    let doctor = doctor_service
        .update_doctor(&user.id, request, auth.token())
        .await?;
    Ok(Json(doctor))
}

/// POST /api/doctors/{doctor_id}/availability/generate - bulk-create slots
pub async fn generate_slots(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<GenerateSlotsRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.id != doctor_id {
        return Err(AppError::Auth(
            "You can only manage your own availability".to_string(),
        ));
    }

    let availability_service = AvailabilityService::new(&config);
    let slots = availability_service
        .generate_slots(&doctor_id, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(slots)))
}

/// GET /api/doctors/{doctor_id}/availability - slot rows for the owner
pub async fn list_slots(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(params): Query<SlotRangeQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.id != doctor_id {
        return Err(AppError::Auth(
            "You can only view your own availability".to_string(),
        ));
    }

    let availability_service = AvailabilityService::new(&config);
    let slots = availability_service
        .slots_for_range(&doctor_id, params.from, params.to, auth.token())
        .await?;
    Ok(Json(slots))
}

/// PUT /api/doctors/{doctor_id}/availability/{slot_id} - edit one slot
pub async fn update_slot(
    State(config): State<Arc<AppConfig>>,
    Path((doctor_id, slot_id)): Path<(String, String)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.id != doctor_id {
        return Err(AppError::Auth(
            "You can only manage your own availability".to_string(),
        ));
    }

    let availability_service = AvailabilityService::new(&config);
    let response = availability_service
        .update_slot(&doctor_id, &slot_id, request, auth.token())
        .await?;
    Ok(Json(response))
}

/// POST /api/doctors/{doctor_id}/verification-documents - submit credentials
pub async fn upload_verification_documents(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UploadDocumentsRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.id != doctor_id {
        return Err(AppError::Auth(
            "You can only submit documents for your own profile".to_string(),
        ));
    }

    let verification_service = VerificationService::new(&config);
    let doctor = verification_service
        .submit_documents(&doctor_id, request, auth.token())
        .await?;
    Ok(Json(doctor))
}

// ===== ADMIN HANDLERS =====

/// GET /api/admin/doctors - every doctor with verification state
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.role.as_deref() != Some("admin") {
        return Err(AppError::Auth("Admin access required".to_string()));
    }

    let doctor_service = DoctorService::new(&config);
    let doctors = doctor_service.list_doctors(auth.token()).await?;
    Ok(Json(doctors))
}

/// PATCH /api/admin/verify-doctor/{doctor_id} - approve or reject a review
pub async fn decide_verification(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<VerificationDecisionRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if user.role.as_deref() != Some("admin") {
        return Err(AppError::Auth("Admin access required".to_string()));
    }

    info!(
        "Admin {} deciding verification for doctor {}",
        user.id, doctor_id
    );
    let verification_service = VerificationService::new(&config);
    let doctor = verification_service
        .decide(&doctor_id, request, auth.token())
        .await?;
    Ok(Json(doctor))
}
