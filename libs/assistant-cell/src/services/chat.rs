use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{AssistantError, ChatReply};

const CHAT_MODEL: &str = "gpt-4o-mini";

/// Every conversation is pinned to this role. The assistant stays an
/// information desk, not a diagnostician.
const SYSTEM_PROMPT: &str = "You are CareSync's health assistant. Offer general \
health information and help people find their way around the platform. You are \
not a doctor: never diagnose, never prescribe, and point anything urgent to \
emergency services.";

pub struct ChatService {
    client: Client,
    api_key: String,
    base_url: String,
    configured: bool,
}

impl ChatService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.chat_api_base_url.clone(),
            configured: config.is_chat_configured(),
        }
    }

    pub async fn reply(&self, message: &str) -> Result<ChatReply, AssistantError> {
        if !self.configured {
            return Err(AssistantError::NotConfigured("Chat API"));
        }
        if message.trim().is_empty() {
            return Err(AssistantError::ValidationError(
                "Message is required".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Forwarding chat message to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": CHAT_MODEL,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": message }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Chat API error ({}): {}", status, text);
            return Err(AssistantError::Upstream(format!(
                "Chat API returned {}",
                status
            )));
        }

        let completion: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Upstream(e.to_string()))?;

        let reply = completion["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AssistantError::Upstream("Chat API response had no completion".to_string())
            })?
            .to_string();

        Ok(ChatReply { reply })
    }
}
