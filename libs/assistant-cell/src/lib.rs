pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{chat_routes, hospital_routes, news_routes};
pub use services::{ChatService, NewsService, PlacesService};
