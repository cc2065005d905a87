use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use appointment_cell::router::{appointment_routes, dashboard_routes};
use assistant_cell::router::{chat_routes, hospital_routes, news_routes};
use auth_cell::router::auth_routes;
use doctor_cell::router::{admin_routes, doctor_routes};
use patient_cell::router::{insurance_routes, medical_history_routes};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Onboarding spans two cells; both handlers sit behind one prefix.
fn onboarding_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/patient", post(patient_cell::handlers::onboard_patient))
        .route("/doctor", post(doctor_cell::handlers::onboard_doctor))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

// Combined identity view plus the role-specific partial updates.
fn profile_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(auth_cell::handlers::get_profile))
        .route(
            "/patient",
            put(patient_cell::handlers::update_patient_profile),
        )
        .route(
            "/doctor",
            put(doctor_cell::handlers::update_doctor_profile),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "CareSync API is running!" }))
        .route("/health", get(health))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/api/onboarding", onboarding_routes(state.clone()))
        .nest("/api/profile", profile_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/dashboard", dashboard_routes(state.clone()))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .nest("/api/insurance", insurance_routes(state.clone()))
        .nest(
            "/api/medical-history",
            medical_history_routes(state.clone()),
        )
        .nest("/api/chat", chat_routes(state.clone()))
        .nest("/api/hospitals", hospital_routes(state.clone()))
        .nest("/api/news", news_routes(state))
}
