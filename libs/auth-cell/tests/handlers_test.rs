// libs/auth-cell/tests/handlers_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers;
use auth_cell::models::{AuthError, LoginRequest, PasswordResetRequest, SignupRequest};
use auth_cell::services::AuthService;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_auth_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

fn create_bearer(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).expect("valid bearer token"))
}

fn signup_request() -> SignupRequest {
    SignupRequest {
        email: "jane@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
        full_name: "Jane Doe".to_string(),
        role: "patient".to_string(),
    }
}

fn session_response() -> Value {
    json!({
        "access_token": "issued-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "email": "jane@example.com" }
    })
}

#[tokio::test]
async fn signup_creates_account_with_role_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({
            "email": "jane@example.com",
            "data": { "full_name": "Jane Doe", "role": "patient", "onboarded": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };

    let result =
        handlers::signup(State(test_config.to_arc()), Json(signup_request())).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn signup_duplicate_email_is_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "msg": "User already registered" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };

    let result =
        handlers::signup(State(test_config.to_arc()), Json(signup_request())).await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let test_config = TestConfig::default();

    let mut request = signup_request();
    request.password = "short".to_string();

    let result = handlers::signup(State(test_config.to_arc()), Json(request)).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn signup_rejects_admin_role() {
    let test_config = TestConfig::default();

    let mut request = signup_request();
    request.role = "admin".to_string();

    let result = handlers::signup(State(test_config.to_arc()), Json(request)).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn login_passes_session_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "jane@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };

    let result = handlers::login(
        State(test_config.to_arc()),
        Json(LoginRequest {
            email: "jane@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
        }),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn login_wrong_password_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };

    let result = handlers::login(
        State(test_config.to_arc()),
        Json(LoginRequest {
            email: "jane@example.com".to_string(),
            password: "wrong".to_string(),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::Auth(_)));
}

#[tokio::test]
async fn password_reset_succeeds_even_when_upstream_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };

    let result = handlers::password_reset(
        State(test_config.to_arc()),
        Json(PasswordResetRequest {
            email: "jane@example.com".to_string(),
        }),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn oauth_url_points_at_auth_api() {
    let test_config = TestConfig::default();
    let service = AuthService::new(&test_config.to_app_config());

    let response = service.oauth_authorize_url("google").unwrap();

    assert_eq!(response.provider, "google");
    assert_eq!(
        response.url,
        format!(
            "{}/auth/v1/authorize?provider=google",
            test_config.supabase_url
        )
    );
}

#[tokio::test]
async fn oauth_unknown_provider_is_rejected() {
    let test_config = TestConfig::default();
    let service = AuthService::new(&test_config.to_app_config());

    let result = service.oauth_authorize_url("myspace");

    assert_matches!(result, Err(AuthError::UnsupportedProvider(_)));
}

#[tokio::test]
async fn validate_token_echoes_claims() {
    let config = Arc::new(TestConfig::default().to_app_config());
    let user = TestUser::patient("jane@example.com").with_name("Jane Doe");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let result = handlers::validate_token(State(config), create_auth_headers(&token)).await;

    let response = result.unwrap().0;
    assert!(response.valid);
    assert_eq!(response.user_id, user.id);
    assert_eq!(response.email, Some(user.email));
    assert_eq!(response.full_name, Some("Jane Doe".to_string()));
    assert_eq!(response.role, Some("patient".to_string()));
    assert!(response.onboarded);
}

#[tokio::test]
async fn validate_token_missing_header() {
    let config = Arc::new(TestConfig::default().to_app_config());

    let result = handlers::validate_token(State(config), HeaderMap::new()).await;

    assert_matches!(
        result,
        Err(AppError::Auth(msg)) if msg == "Missing authorization header"
    );
}

#[tokio::test]
async fn validate_token_rejects_non_bearer_header() {
    let config = Arc::new(TestConfig::default().to_app_config());
    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("sometoken"));

    let result = handlers::validate_token(State(config), headers).await;

    assert_matches!(
        result,
        Err(AppError::Auth(msg)) if msg == "Invalid authorization header format"
    );
}

#[tokio::test]
async fn validate_token_rejects_expired_token() {
    let config = Arc::new(TestConfig::default().to_app_config());
    let user = TestUser::default();
    let token = JwtTestUtils::create_expired_token(&user, &config.supabase_jwt_secret);

    let result = handlers::validate_token(State(config), create_auth_headers(&token)).await;

    assert_matches!(result, Err(AppError::Auth(_)));
}

#[tokio::test]
async fn profile_combines_identity_with_patient_row() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("jane@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::patient_response(&patient.id, "jane@example.com", "Jane", "Doe"),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));

    let result = handlers::get_profile(
        State(test_config.to_arc()),
        create_bearer(&token),
        Extension(patient.to_user()),
    )
    .await;

    let response = result.unwrap().into_response();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let profile: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(profile["role"], json!("patient"));
    assert_eq!(profile["onboarded"], json!(true));
    assert_eq!(profile["profile"]["first_name"], json!("Jane"));
}

#[tokio::test]
async fn profile_reads_doctor_row_for_doctor_role() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::doctor_response(
                &doctor.id,
                "doc@example.com",
                "cardiology",
                "approved",
            ),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A doctor's combined view never touches the patients table.
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };
    let token = JwtTestUtils::create_test_token(&doctor, &test_config.jwt_secret, Some(1));

    let result = handlers::get_profile(
        State(test_config.to_arc()),
        create_bearer(&token),
        Extension(doctor.to_user()),
    )
    .await;

    let response = result.unwrap().into_response();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let profile: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(profile["role"], json!("doctor"));
    assert_eq!(profile["profile"]["specialty"], json!("cardiology"));
}

#[tokio::test]
async fn profile_is_null_before_onboarding() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("new@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));

    let result = handlers::get_profile(
        State(test_config.to_arc()),
        create_bearer(&token),
        Extension(patient.to_user()),
    )
    .await;

    let response = result.unwrap().into_response();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let profile: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(profile["onboarded"], json!(false));
    assert!(profile["profile"].is_null());
}
