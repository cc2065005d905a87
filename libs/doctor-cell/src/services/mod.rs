pub mod availability;
pub mod doctor;
pub mod verification;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use verification::VerificationService;
