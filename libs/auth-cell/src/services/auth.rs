use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::error::StoreError;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AuthError, LoginRequest, OAuthAuthorizeResponse, SignupRequest, OAUTH_PROVIDERS,
};

/// Proxy over the hosted auth API. Password hashing, token issuance and
/// the OAuth handshakes all happen upstream; this service shapes the
/// requests and translates the rejections.
pub struct AuthService {
    supabase: SupabaseClient,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create an account. The role lands in the user metadata and is
    /// echoed back inside every token the auth API issues afterwards.
    pub async fn signup(&self, request: SignupRequest) -> Result<Value, AuthError> {
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(AuthError::ValidationError(
                "A valid email is required".to_string(),
            ));
        }
        if request.password.len() < 8 {
            return Err(AuthError::ValidationError(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if request.full_name.trim().is_empty() {
            return Err(AuthError::ValidationError(
                "Full name is required".to_string(),
            ));
        }
        if !matches!(request.role.as_str(), "patient" | "doctor") {
            return Err(AuthError::ValidationError(
                "Role must be patient or doctor".to_string(),
            ));
        }

        debug!("Signing up {}", request.email);

        let signup_data = json!({
            "email": request.email,
            "password": request.password,
            "data": {
                "full_name": request.full_name,
                "role": request.role,
                "onboarded": false
            }
        });

        let session = self
            .supabase
            .request::<Value>(Method::POST, "/auth/v1/signup", None, Some(signup_data))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserExists,
                StoreError::Api { message, .. } if message.contains("already registered") => {
                    AuthError::UserExists
                }
                other => AuthError::Upstream(other.to_string()),
            })?;

        Ok(session)
    }

    /// Password grant against the auth API; the session JSON passes
    /// through untouched.
    pub async fn login(&self, request: LoginRequest) -> Result<Value, AuthError> {
        debug!("Login attempt for {}", request.email);

        let login_data = json!({
            "email": request.email,
            "password": request.password
        });

        let session = self
            .supabase
            .request::<Value>(
                Method::POST,
                "/auth/v1/token?grant_type=password",
                None,
                Some(login_data),
            )
            .await
            .map_err(|e| match e {
                StoreError::Auth(_) | StoreError::Api { status: 400, .. } => {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Upstream(other.to_string()),
            })?;

        Ok(session)
    }

    /// Trigger a recovery mail. The caller always sees success so the
    /// endpoint cannot be used to probe which emails have accounts.
    pub async fn request_password_reset(&self, email: &str) {
        let result = self
            .supabase
            .request::<Value>(
                Method::POST,
                "/auth/v1/recover",
                None,
                Some(json!({ "email": email })),
            )
            .await;

        if let Err(e) = result {
            warn!("Password recovery for {} not dispatched: {}", email, e);
        }
    }

    pub fn oauth_authorize_url(&self, provider: &str) -> Result<OAuthAuthorizeResponse, AuthError> {
        if !OAUTH_PROVIDERS.contains(&provider) {
            return Err(AuthError::UnsupportedProvider(provider.to_string()));
        }

        Ok(OAuthAuthorizeResponse {
            provider: provider.to_string(),
            url: self
                .supabase
                .get_public_url(&format!("/auth/v1/authorize?provider={}", provider)),
        })
    }
}
