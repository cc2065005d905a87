// libs/assistant-cell/tests/news_test.rs

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::models::AssistantError;
use assistant_cell::services::NewsService;
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn news_config(mock_server: &MockServer) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.news_api_base_url = mock_server.uri();
    config
}

#[tokio::test]
async fn parses_health_headlines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("category", "health"))
        .and(header("X-Api-Key", "test-news-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "articles": [
                {
                    "title": "New flu strain under watch",
                    "source": { "name": "Health Wire" },
                    "url": "https://news.example/flu",
                    "publishedAt": "2025-06-01T08:00:00Z"
                },
                {
                    "title": "Hospitals expand telehealth",
                    "source": {},
                    "url": "https://news.example/telehealth"
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = NewsService::new(&news_config(&mock_server));
    let articles = service.health_headlines().await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "New flu strain under watch");
    assert_eq!(articles[0].source, "Health Wire");
    assert_eq!(
        articles[0].published_at.as_deref(),
        Some("2025-06-01T08:00:00Z")
    );
    assert_eq!(articles[1].source, "unknown");
    assert!(articles[1].published_at.is_none());
}

#[tokio::test]
async fn rate_limit_is_surfaced_as_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = NewsService::new(&news_config(&mock_server));
    let result = service.health_headlines().await;

    assert_matches!(result, Err(AssistantError::Upstream(_)));
}

#[tokio::test]
async fn missing_api_key_reads_as_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.news_api_key = String::new();

    let service = NewsService::new(&config);
    let result = service.health_headlines().await;

    assert_matches!(result, Err(AssistantError::NotConfigured(_)));
}
