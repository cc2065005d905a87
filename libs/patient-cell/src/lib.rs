pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{insurance_routes, medical_history_routes};
pub use services::{InsuranceService, MedicalHistoryService, PatientService};
