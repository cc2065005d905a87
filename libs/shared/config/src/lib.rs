use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from_address: String,
    pub admin_notification_email: String,
    pub openai_api_key: String,
    pub chat_api_base_url: String,
    pub places_api_key: String,
    pub places_api_base_url: String,
    pub news_api_key: String,
    pub news_api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, using empty value");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_KEY not set, using empty value");
                    String::new()
                }),
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("MAIL_FROM_ADDRESS not set, using default");
                    "CareSync <no-reply@caresync.health>".to_string()
                }),
            admin_notification_email: env::var("ADMIN_NOTIFICATION_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_NOTIFICATION_EMAIL not set, using empty value");
                    String::new()
                }),
            openai_api_key: env::var("OPENAI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("OPENAI_API_KEY not set, using empty value");
                    String::new()
                }),
            chat_api_base_url: env::var("CHAT_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            places_api_key: env::var("PLACES_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("PLACES_API_KEY not set, using empty value");
                    String::new()
                }),
            places_api_base_url: env::var("PLACES_API_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api/place".to_string()),
            news_api_key: env::var("NEWS_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("NEWS_API_KEY not set, using empty value");
                    String::new()
                }),
            news_api_base_url: env::var("NEWS_API_BASE_URL")
                .unwrap_or_else(|_| "https://newsapi.org/v2".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty()
            && !self.mail_api_key.is_empty()
            && !self.mail_from_address.is_empty()
    }

    pub fn is_chat_configured(&self) -> bool {
        !self.openai_api_key.is_empty() && !self.chat_api_base_url.is_empty()
    }

    pub fn is_places_configured(&self) -> bool {
        !self.places_api_key.is_empty() && !self.places_api_base_url.is_empty()
    }

    pub fn is_news_configured(&self) -> bool {
        !self.news_api_key.is_empty() && !self.news_api_base_url.is_empty()
    }
}
