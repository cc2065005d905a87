use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use tracing::{debug, info};

use doctor_cell::models::DoctorError;
use doctor_cell::services::DoctorService;
use patient_cell::models::PatientError;
use patient_cell::services::PatientService;
use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token as verify_jwt;

use crate::models::{LoginRequest, PasswordResetRequest, SignupRequest};
use crate::services::AuthService;

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth(
            "Invalid authorization header format".to_string(),
        ));
    }

    Ok(auth_value[7..].to_string())
}

/// POST /auth/signup - create an account with the hosted auth API
pub async fn signup(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    info!("Signup request for {}", request.email);
    let auth_service = AuthService::new(&config);
    let session = auth_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login - password grant
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    let auth_service = AuthService::new(&config);
    let session = auth_service.login(request).await?;
    Ok(Json(session))
}

/// POST /auth/password-reset - trigger a recovery mail, always 200
pub async fn password_reset(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(&config);
    auth_service.request_password_reset(&request.email).await;
    Ok(Json(json!({
        "message": "If the account exists, a recovery mail is on its way"
    })))
}

/// GET /auth/oauth/{provider} - the provider authorize URL
pub async fn oauth_authorize(
    State(config): State<Arc<AppConfig>>,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(&config);
    let response = auth_service.oauth_authorize_url(&provider)?;
    Ok(Json(response))
}

/// GET /auth/validate - echo the claims carried by a valid bearer token
pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;
    let user = verify_jwt(&token, &config.supabase_jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
        onboarded: user.onboarded,
    }))
}

/// GET /api/profile - the caller's role profile, if onboarding created one
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting profile for user: {}", user.id);
    let token = auth.token();

    let role = user.role.clone().unwrap_or_else(|| "patient".to_string());
    let profile = match role.as_str() {
        "doctor" => match DoctorService::new(&config).get_doctor(&user.id, Some(token)).await {
            Ok(doctor) => Some(
                serde_json::to_value(doctor).map_err(|e| AppError::Internal(e.to_string()))?,
            ),
            Err(DoctorError::NotFound) => None,
            Err(e) => return Err(e.into()),
        },
        _ => match PatientService::new(&config).get_patient(&user.id, token).await {
            Ok(patient) => Some(
                serde_json::to_value(patient).map_err(|e| AppError::Internal(e.to_string()))?,
            ),
            Err(PatientError::NotFound) => None,
            Err(e) => return Err(e.into()),
        },
    };

    Ok(Json(json!({
        "user_id": user.id,
        "email": user.email,
        "role": role,
        "onboarded": profile.is_some(),
        "profile": profile
    })))
}
