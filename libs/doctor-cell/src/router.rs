use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Routes mounted under /api/doctors.
pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/search", get(handlers::search_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/slots", get(handlers::get_day_schedule));

    let protected_routes = Router::new()
        .route(
            "/{doctor_id}/availability/generate",
            post(handlers::generate_slots),
        )
        .route("/{doctor_id}/availability", get(handlers::list_slots))
        .route(
            "/{doctor_id}/availability/{slot_id}",
            put(handlers::update_slot),
        )
        .route(
            "/{doctor_id}/verification-documents",
            post(handlers::upload_verification_documents),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public_routes.merge(protected_routes).with_state(state)
}

/// Routes mounted under /api/admin.
pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route(
            "/verify-doctor/{doctor_id}",
            patch(handlers::decide_verification),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
