pub mod insurance;
pub mod medical_history;
pub mod patient;

pub use insurance::InsuranceService;
pub use medical_history::MedicalHistoryService;
pub use patient::PatientService;
