use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Routes mounted under /api/insurance.
pub fn insurance_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_insurance_policies).post(handlers::create_insurance_policy),
        )
        .route(
            "/{policy_id}",
            put(handlers::update_insurance_policy).delete(handlers::delete_insurance_policy),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Routes mounted under /api/medical-history.
pub fn medical_history_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_health_issues).post(handlers::add_health_issue),
        )
        .route(
            "/{issue_id}",
            put(handlers::update_health_issue).delete(handlers::delete_health_issue),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
