use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{AssistantError, Hospital};

pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

pub struct PlacesService {
    client: Client,
    api_key: String,
    base_url: String,
    configured: bool,
}

impl PlacesService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.places_api_key.clone(),
            base_url: config.places_api_base_url.clone(),
            configured: config.is_places_configured(),
        }
    }

    pub async fn nearby_hospitals(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<Hospital>, AssistantError> {
        if !self.configured {
            return Err(AssistantError::NotConfigured("Places API"));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AssistantError::ValidationError(
                "Coordinates out of range".to_string(),
            ));
        }

        let url = format!("{}/nearbysearch/json", self.base_url);
        debug!(
            "Hospital lookup around ({}, {}) within {}m",
            latitude, longitude, radius_meters
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", format!("{},{}", latitude, longitude)),
                ("radius", radius_meters.to_string()),
                ("type", "hospital".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Places API error ({}): {}", status, text);
            return Err(AssistantError::Upstream(format!(
                "Places API returned {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Upstream(e.to_string()))?;

        // Entries without a name or coordinates are dropped rather than
        // failing the whole lookup.
        let hospitals = payload["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|place| {
                        Some(Hospital {
                            name: place["name"].as_str()?.to_string(),
                            address: place["vicinity"].as_str().unwrap_or_default().to_string(),
                            latitude: place["geometry"]["location"]["lat"].as_f64()?,
                            longitude: place["geometry"]["location"]["lng"].as_f64()?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(hospitals)
    }
}
