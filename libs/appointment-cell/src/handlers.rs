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

use crate::models::{BookAppointmentRequest, RescheduleAppointmentRequest};
use crate::services::{BookingService, DashboardService};

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// POST /api/appointments - book a tick for the authenticated patient
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Booking request from user {} for doctor {}",
        user.id, request.doctor_id
    );
    let booking_service = BookingService::new(&config);
    let appointment = booking_service
        .book_appointment(&user, request, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments - the caller's appointments, optionally bounded
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<AppointmentListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let booking_service = BookingService::new(&config);
    let appointments = booking_service
        .list_appointments(&user, params.from, params.to, auth.token())
        .await?;
    Ok(Json(appointments))
}

/// PUT /api/appointments/{appointment_id}/reschedule - move or annotate
pub async fn reschedule_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking_service = BookingService::new(&config);
    let appointment = booking_service
        .reschedule_appointment(&appointment_id, &user, request, auth.token())
        .await?;
    Ok(Json(appointment))
}

/// DELETE /api/appointments/{appointment_id} - cancel a booking
pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let booking_service = BookingService::new(&config);
    booking_service
        .cancel_appointment(&appointment_id, &user, auth.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard - role-aware landing summary
pub async fn get_dashboard(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard_service = DashboardService::new(&config);
    let summary = dashboard_service.summary(&user, auth.token()).await?;
    Ok(Json(summary))
}
