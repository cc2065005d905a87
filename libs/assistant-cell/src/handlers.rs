use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::ChatRequest;
use crate::services::places::DEFAULT_RADIUS_METERS;
use crate::services::{ChatService, NewsService, PlacesService};

#[derive(Debug, Deserialize)]
pub struct HospitalSearchQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<u32>,
}

/// POST /api/chat - one round trip to the health assistant
pub async fn chat(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Chat message from user {}", user.id);
    let chat_service = ChatService::new(&config);
    let reply = chat_service.reply(&request.message).await?;
    Ok(Json(reply))
}

/// GET /api/hospitals?lat=&lng=&radius= - hospitals near a coordinate
pub async fn nearby_hospitals(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<HospitalSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let places_service = PlacesService::new(&config);
    let hospitals = places_service
        .nearby_hospitals(
            params.lat,
            params.lng,
            params.radius.unwrap_or(DEFAULT_RADIUS_METERS),
        )
        .await?;
    Ok(Json(hospitals))
}

/// GET /api/news - current health headlines
pub async fn health_news(
    State(config): State<Arc<AppConfig>>,
) -> Result<impl IntoResponse, AppError> {
    let news_service = NewsService::new(&config);
    let articles = news_service.health_headlines().await?;
    Ok(Json(articles))
}
