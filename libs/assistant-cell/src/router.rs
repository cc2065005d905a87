use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Routes mounted under /api/chat.
pub fn chat_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::chat))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Routes mounted under /api/hospitals.
pub fn hospital_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::nearby_hospitals))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Routes mounted under /api/news.
pub fn news_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::health_news))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
