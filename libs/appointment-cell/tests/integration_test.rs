// libs/appointment-cell/tests/integration_test.rs
//
// Wire-level checks: authentication at the router boundary and the HTTP
// status codes the error translation produces.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::{appointment_routes, dashboard_routes};
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

#[tokio::test]
async fn booking_requires_bearer_token() {
    let test_config = TestConfig::default();
    let app = appointment_routes(test_config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_requires_bearer_token() {
    let test_config = TestConfig::default();
    let app = dashboard_routes(test_config.to_arc());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_taken_tick_maps_to_bad_request() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();
    let patient = TestUser::patient("patient@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::doctor_response(
                &doctor_id,
                "doc@example.com",
                "cardiology",
                "approved",
            ),
        ]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::appointment_response(
                &Uuid::new_v4().to_string(),
                &doctor_id,
                &Uuid::new_v4().to_string(),
                "2025-06-02",
                "09:30:00",
                "earlier@example.com",
            ),
        ]))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default()
    };
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));
    let app = appointment_routes(test_config.to_arc());

    let body = json!({
        "doctor_id": doctor_id,
        "date": "2025-06-02",
        "start_time": "09:30:00",
        "reason": "Routine checkup"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancelling_a_booking_returns_no_content() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();
    let patient = TestUser::patient("patient@example.com");

    let appointment_row = MockSupabaseResponses::appointment_response(
        &appointment_id,
        &doctor_id,
        &patient.id,
        "2025-06-02",
        "09:30:00",
        "patient@example.com",
    );

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![appointment_row.clone()]))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![appointment_row]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockSupabaseResponses::doctor_response(
                &doctor_id,
                "doc@example.com",
                "cardiology",
                "approved",
            ),
        ]))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig {
        supabase_url: mock_server.uri(),
        mail_api_url: mock_server.uri(),
        ..TestConfig::default()
    };
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));
    let app = appointment_routes(test_config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", appointment_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
