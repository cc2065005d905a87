pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{appointment_routes, dashboard_routes};
pub use services::{BookingService, DashboardService};
