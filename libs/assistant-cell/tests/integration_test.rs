// libs/assistant-cell/tests/integration_test.rs
//
// Wire-level checks: bearer-token enforcement on every assistant route
// and the 502 translation for an unconfigured collaborator.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::router::{chat_routes, hospital_routes, news_routes};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

#[tokio::test]
async fn chat_requires_bearer_token() {
    let test_config = TestConfig::default();
    let app = chat_routes(test_config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn hospitals_require_bearer_token() {
    let test_config = TestConfig::default();
    let app = hospital_routes(test_config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?lat=47.37&lng=8.54")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_round_trip_returns_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Hydration helps." } }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::default();
    let patient = TestUser::patient("jane@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));

    let mut config = test_config.to_app_config();
    config.chat_api_base_url = mock_server.uri();
    let app = chat_routes(Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "What helps with a cold?"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["reply"], json!("Hydration helps."));
}

#[tokio::test]
async fn unconfigured_news_maps_to_bad_gateway() {
    let test_config = TestConfig::default();
    let patient = TestUser::patient("jane@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));

    let mut config = test_config.to_app_config();
    config.news_api_key = String::new();
    let app = news_routes(Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
