use futures::future::join;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{BookingNotice, NotificationError, VerificationNotice};
use crate::services::mail::MailClient;

/// Single dispatch point for every outbound notification. One method per
/// event; each resolves its recipients and template and sends through the
/// mail client. All methods return `()` on purpose: delivery problems are
/// logged and must never fail the operation that triggered them.
pub struct Notifier {
    mail: MailClient,
    admin_email: String,
    enabled: bool,
}

impl Notifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            mail: MailClient::new(config),
            admin_email: config.admin_notification_email.clone(),
            enabled: config.is_mail_configured(),
        }
    }

    pub async fn booking_created(&self, notice: &BookingNotice) {
        if !self.enabled {
            debug!("Mail not configured, skipping booking_created notification");
            return;
        }

        let data = Self::booking_data(notice);

        let to_doctor = self.mail.send(
            &notice.doctor_email,
            "New appointment booked",
            "booking_created_doctor",
            data.clone(),
        );
        let to_patient = self.mail.send(
            &notice.patient_email,
            "Your appointment is confirmed",
            "booking_created_patient",
            data,
        );

        let (doctor_sent, patient_sent) = join(to_doctor, to_patient).await;
        Self::log_outcome("booking_created", &notice.doctor_email, doctor_sent);
        Self::log_outcome("booking_created", &notice.patient_email, patient_sent);
    }

    pub async fn booking_rescheduled(&self, notice: &BookingNotice) {
        if !self.enabled {
            debug!("Mail not configured, skipping booking_rescheduled notification");
            return;
        }

        let data = Self::booking_data(notice);

        let to_doctor = self.mail.send(
            &notice.doctor_email,
            "Appointment rescheduled",
            "booking_rescheduled_doctor",
            data.clone(),
        );
        let to_patient = self.mail.send(
            &notice.patient_email,
            "Your appointment was rescheduled",
            "booking_rescheduled_patient",
            data,
        );

        let (doctor_sent, patient_sent) = join(to_doctor, to_patient).await;
        Self::log_outcome("booking_rescheduled", &notice.doctor_email, doctor_sent);
        Self::log_outcome("booking_rescheduled", &notice.patient_email, patient_sent);
    }

    pub async fn booking_cancelled(&self, notice: &BookingNotice) {
        if !self.enabled {
            debug!("Mail not configured, skipping booking_cancelled notification");
            return;
        }

        let data = Self::booking_data(notice);

        let to_doctor = self.mail.send(
            &notice.doctor_email,
            "Appointment cancelled",
            "booking_cancelled_doctor",
            data.clone(),
        );
        let to_patient = self.mail.send(
            &notice.patient_email,
            "Your appointment was cancelled",
            "booking_cancelled_patient",
            data,
        );

        let (doctor_sent, patient_sent) = join(to_doctor, to_patient).await;
        Self::log_outcome("booking_cancelled", &notice.doctor_email, doctor_sent);
        Self::log_outcome("booking_cancelled", &notice.patient_email, patient_sent);
    }

    /// Admin decision on a verification; exactly one mail, to the doctor.
    pub async fn verification_decided(&self, notice: &VerificationNotice) {
        if !self.enabled {
            debug!("Mail not configured, skipping verification_decided notification");
            return;
        }

        let template = if notice.approved {
            "verification_approved"
        } else {
            "verification_rejected"
        };

        let sent = self.mail.send(
            &notice.doctor_email,
            "Your verification has been reviewed",
            template,
            json!({
                "doctor_name": notice.doctor_name,
                "approved": notice.approved
            }),
        ).await;
        Self::log_outcome(template, &notice.doctor_email, sent);
    }

    /// Document (re)submission; exactly one mail, to the review inbox.
    pub async fn documents_submitted(&self, doctor_name: &str, doctor_email: &str) {
        if !self.enabled {
            debug!("Mail not configured, skipping documents_submitted notification");
            return;
        }
        if self.admin_email.is_empty() {
            warn!("ADMIN_NOTIFICATION_EMAIL not set, dropping documents_submitted notification");
            return;
        }

        let sent = self.mail.send(
            &self.admin_email,
            "Verification documents awaiting review",
            "documents_submitted",
            json!({
                "doctor_name": doctor_name,
                "doctor_email": doctor_email
            }),
        ).await;
        Self::log_outcome("documents_submitted", &self.admin_email, sent);
    }

    fn booking_data(notice: &BookingNotice) -> serde_json::Value {
        json!({
            "doctor_name": notice.doctor_name,
            "patient_name": notice.patient_name,
            "date": notice.date.to_string(),
            "start_time": notice.start_time.format("%H:%M").to_string(),
            "reason": notice.reason
        })
    }

    fn log_outcome(event: &str, recipient: &str, outcome: Result<(), NotificationError>) {
        if let Err(e) = outcome {
            warn!("Failed to send {} notification to {}: {}", event, recipient, e);
        }
    }
}
