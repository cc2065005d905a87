pub mod mail;
pub mod notifier;

pub use mail::MailClient;
pub use notifier::Notifier;
