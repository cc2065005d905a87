// libs/assistant-cell/tests/chat_test.rs

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::models::AssistantError;
use assistant_cell::services::ChatService;
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn chat_config(mock_server: &MockServer) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.chat_api_base_url = mock_server.uri();
    config
}

#[tokio::test]
async fn reply_extracts_completion_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-openai-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Plenty of fluids and rest." } }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&chat_config(&mock_server));
    let reply = service.reply("What helps with a cold?").await.unwrap();

    assert_eq!(reply.reply, "Plenty of fluids and rest.");
}

#[tokio::test]
async fn reply_requires_a_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&chat_config(&mock_server));
    let result = service.reply("   ").await;

    assert_matches!(result, Err(AssistantError::ValidationError(_)));
}

#[tokio::test]
async fn missing_api_key_reads_as_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.openai_api_key = String::new();

    let service = ChatService::new(&config);
    let result = service.reply("hello").await;

    assert_matches!(result, Err(AssistantError::NotConfigured(_)));
}

#[tokio::test]
async fn upstream_failure_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&chat_config(&mock_server));
    let result = service.reply("hello").await;

    assert_matches!(result, Err(AssistantError::Upstream(_)));
}

#[tokio::test]
async fn empty_choice_list_is_an_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&chat_config(&mock_server));
    let result = service.reply("hello").await;

    assert_matches!(result, Err(AssistantError::Upstream(_)));
}
