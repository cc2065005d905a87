pub mod booking;
pub mod dashboard;

pub use booking::BookingService;
pub use dashboard::DashboardService;
