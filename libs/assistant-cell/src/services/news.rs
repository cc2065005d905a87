use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{AssistantError, NewsArticle};

const PAGE_SIZE: u32 = 10;

pub struct NewsService {
    client: Client,
    api_key: String,
    base_url: String,
    configured: bool,
}

impl NewsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.news_api_key.clone(),
            base_url: config.news_api_base_url.clone(),
            configured: config.is_news_configured(),
        }
    }

    pub async fn health_headlines(&self) -> Result<Vec<NewsArticle>, AssistantError> {
        if !self.configured {
            return Err(AssistantError::NotConfigured("News API"));
        }

        let url = format!("{}/top-headlines", self.base_url);
        debug!("Fetching health headlines");

        let page_size = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("category", "health"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("News API error ({}): {}", status, text);
            return Err(AssistantError::Upstream(format!(
                "News API returned {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Upstream(e.to_string()))?;

        let articles = payload["articles"]
            .as_array()
            .map(|articles| {
                articles
                    .iter()
                    .filter_map(|article| {
                        Some(NewsArticle {
                            title: article["title"].as_str()?.to_string(),
                            source: article["source"]["name"]
                                .as_str()
                                .unwrap_or("unknown")
                                .to_string(),
                            url: article["url"].as_str()?.to_string(),
                            published_at: article["publishedAt"]
                                .as_str()
                                .map(|s| s.to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(articles)
    }
}
