use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::NotificationError;

/// Thin client for the transactional mail API. Template rendering and
/// delivery happen on the provider side; we only post the message.
pub struct MailClient {
    client: Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl MailClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from_address: config.mail_from_address.clone(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, template: &str, data: Value)
                      -> Result<(), NotificationError> {
        if self.api_url.is_empty() || self.api_key.is_empty() {
            return Err(NotificationError::NotConfigured);
        }

        let url = format!("{}/messages", self.api_url);
        debug!("Sending '{}' mail to {}", template, to);

        let response = self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "from": self.from_address,
                "to": to,
                "subject": subject,
                "template": template,
                "data": data
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Mail API error ({}): {}", status, message);
            return Err(NotificationError::Api { status: status.as_u16(), message });
        }

        Ok(())
    }
}
