pub mod chat;
pub mod news;
pub mod places;

pub use chat::ChatService;
pub use news::NewsService;
pub use places::PlacesService;
