use serde::{Deserialize, Serialize};

use shared_database::error::StoreError;
use shared_models::error::AppError;

/// Providers the hosted auth API can broker a handshake for.
pub const OAUTH_PROVIDERS: [&str; 3] = ["google", "apple", "facebook"];

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

// Admin accounts are provisioned out of band, never self-signed-up.
fn default_role() -> String {
    "patient".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct OAuthAuthorizeResponse {
    pub provider: String,
    pub url: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    UserExists,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth API error: {0}")]
    Upstream(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Upstream(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserExists => AppError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::UnsupportedProvider(_) => AppError::ValidationError(err.to_string()),
            AuthError::ValidationError(msg) => AppError::ValidationError(msg),
            AuthError::Upstream(msg) => AppError::ExternalService(msg),
        }
    }
}
