use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Routes mounted under /auth. All of them are public: validate checks
/// the presented token itself instead of going through the middleware.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/password-reset", post(handlers::password_reset))
        .route("/oauth/{provider}", get(handlers::oauth_authorize))
        .route("/validate", get(handlers::validate_token))
        .with_state(state)
}
