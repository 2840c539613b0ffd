//! Turn dispatch — routes each inbound message through the doctor-reply
//! path, the global cancel, and the intake state machine, and sends exactly
//! one reply.

use std::sync::Arc;

use chrono::Local;

use crate::assignment::AssignmentResolver;
use crate::catalog::Catalog;
use crate::channels::Messenger;
use crate::recorder::SubmissionRecorder;
use crate::responder::DoctorReplyHandler;
use crate::session::{self, Outcome, SessionStore, prompts};
use crate::sheets::{RosterStore, SubmissionStore};

pub struct IntakeService {
    catalog: Catalog,
    sessions: SessionStore,
    recorder: SubmissionRecorder,
    doctor_replies: DoctorReplyHandler,
    messenger: Arc<dyn Messenger>,
}

impl IntakeService {
    pub fn new(
        catalog: Catalog,
        submissions: Arc<dyn SubmissionStore>,
        roster: Arc<dyn RosterStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let resolver = AssignmentResolver::new(roster);
        let recorder =
            SubmissionRecorder::new(submissions.clone(), resolver, messenger.clone());
        let doctor_replies = DoctorReplyHandler::new(submissions, messenger.clone());
        Self {
            catalog,
            sessions: SessionStore::new(),
            recorder,
            doctor_replies,
            messenger,
        }
    }

    /// Process one inbound message and send the turn's reply.
    ///
    /// Never returns an error: external failures are logged and degrade the
    /// turn, so the webhook can always acknowledge receipt.
    pub async fn handle_message(&self, from: &str, text: &str) {
        tracing::info!(%from, %text, "inbound message");

        // Doctor replies win over session routing.
        match self.doctor_replies.try_handle(from, text).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "doctor reply check failed; continuing with session routing");
            }
        }

        // Global interrupt, valid at any step and with no session at all.
        if text.trim().eq_ignore_ascii_case("cancel") {
            self.sessions.remove(from).await;
            self.send(from, &prompts::cancelled()).await;
            return;
        }

        let session = self.sessions.get(from).await.unwrap_or_default();
        let today = Local::now().date_naive();

        match session::advance(session, text, &self.catalog, today) {
            Outcome::Continue { session, reply } => {
                self.sessions.insert(from, session).await;
                self.send(from, &reply).await;
            }
            Outcome::Close { reply } => {
                self.sessions.remove(from).await;
                self.send(from, &reply).await;
            }
            Outcome::Submit { intake } => {
                self.sessions.remove(from).await;
                let reply = match self.recorder.record(intake, from).await {
                    Ok(row) => prompts::confirmation(&row),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to record submission");
                        prompts::submission_failed()
                    }
                };
                self.send(from, &reply).await;
            }
        }
    }

    /// Whether `address` currently has an in-progress session.
    pub async fn has_session(&self, address: &str) -> bool {
        self.sessions.get(address).await.is_some()
    }

    async fn send(&self, to: &str, body: &str) {
        if let Err(e) = self.messenger.send_text(to, body).await {
            tracing::warn!(error = %e, %to, "reply send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::testing::RecordingMessenger;
    use crate::sheets::{Doctor, MemorySheets, SubmissionStatus};

    const USER: &str = "15550001111";
    const DOCTOR: &str = "15557770000";

    fn service_with(
        doctors: Vec<Doctor>,
    ) -> (IntakeService, Arc<MemorySheets>, Arc<RecordingMessenger>) {
        let sheets = Arc::new(MemorySheets::with_doctors(doctors));
        let messenger = Arc::new(RecordingMessenger::new());
        let service = IntakeService::new(
            Catalog::default(),
            sheets.clone(),
            sheets.clone(),
            messenger.clone(),
        );
        (service, sheets, messenger)
    }

    fn orthodontist() -> Doctor {
        Doctor {
            id: "d1".into(),
            name: "Dr. Osei".into(),
            address: DOCTOR.into(),
            specialty: "Orthodontics".into(),
            active: true,
            priority: 1,
        }
    }

    async fn last_reply(messenger: &RecordingMessenger) -> String {
        messenger.sent().await.last().cloned().unwrap().1
    }

    #[tokio::test]
    async fn cancel_without_a_session_still_acknowledges() {
        let (service, _, messenger) = service_with(vec![]);

        service.handle_message(USER, "CANCEL").await;

        assert!(!service.has_session(USER).await);
        assert!(last_reply(&messenger).await.contains("cancelled"));
    }

    #[tokio::test]
    async fn cancel_mid_flow_removes_the_session() {
        let (service, _, messenger) = service_with(vec![]);

        service.handle_message(USER, "hi").await;
        service.handle_message(USER, "1").await;
        assert!(service.has_session(USER).await);

        service.handle_message(USER, "Cancel").await;
        assert!(!service.has_session(USER).await);
        assert!(last_reply(&messenger).await.contains("cancelled"));

        // A fresh message starts over at the main menu.
        service.handle_message(USER, "hello again").await;
        assert!(last_reply(&messenger).await.contains("1. Book an appointment"));
    }

    #[tokio::test]
    async fn full_flow_records_an_assigned_submission() {
        let (service, sheets, messenger) = service_with(vec![orthodontist()]);

        for input in ["hi", "1", "1", "1", "2", "2", "1", "Jane Doe", "0", "1"] {
            service.handle_message(USER, input).await;
        }

        let rows = sheets.submissions().await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.status, SubmissionStatus::Assigned);
        assert_eq!(row.requester, USER);
        assert_eq!(row.doctor_address, DOCTOR);
        assert_eq!(row.patient_name, "Jane Doe");
        assert!(!row.is_private);

        // Session is gone once submitted.
        assert!(!service.has_session(USER).await);

        // The doctor got a notification, the user got the summary.
        let sent = messenger.sent().await;
        let to_doctor: Vec<_> = sent.iter().filter(|(to, _)| to == DOCTOR).collect();
        assert_eq!(to_doctor.len(), 1);
        assert!(to_doctor[0].1.contains("Reply 1 to accept"));
        let summary = &sent.last().unwrap().1;
        assert!(summary.contains(&row.id));
        assert!(summary.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn user_digit_mid_flow_is_not_stolen_by_doctor_path() {
        let (service, sheets, _) = service_with(vec![orthodontist()]);

        // A doctor has an outstanding assignment...
        for input in ["hi", "1", "1", "1", "2", "2", "1", "Jane Doe", "0", "1"] {
            service.handle_message(USER, input).await;
        }
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Assigned
        );

        // ...while a different user types "1" mid-flow; their session advances
        // and the submission is untouched.
        let other = "15550002222";
        service.handle_message(other, "hi").await;
        service.handle_message(other, "1").await;
        assert!(service.has_session(other).await);
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Assigned
        );

        // The doctor's own "1" is consumed by the reply path, not a session.
        service.handle_message(DOCTOR, "1").await;
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Accepted
        );
        assert!(!service.has_session(DOCTOR).await);
    }

    #[tokio::test]
    async fn no_available_doctor_records_pending() {
        let (service, sheets, _) = service_with(vec![]);

        for input in ["hi", "1", "1", "1", "2", "2", "1", "Jane Doe", "0", "1"] {
            service.handle_message(USER, input).await;
        }

        let rows = sheets.submissions().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, SubmissionStatus::Pending);
        assert!(rows[0].doctor_address.is_empty());
    }

    #[tokio::test]
    async fn declining_terms_does_not_record() {
        let (service, sheets, messenger) = service_with(vec![orthodontist()]);

        for input in ["hi", "1", "1", "1", "2", "2", "1", "Jane Doe", "0", "2"] {
            service.handle_message(USER, input).await;
        }

        assert!(sheets.submissions().await.is_empty());
        assert!(!service.has_session(USER).await);
        assert!(last_reply(&messenger).await.contains("cancelled"));
    }

    #[tokio::test]
    async fn send_failures_do_not_panic_the_turn() {
        let sheets = Arc::new(MemorySheets::new());
        let service = IntakeService::new(
            Catalog::default(),
            sheets.clone(),
            sheets,
            Arc::new(RecordingMessenger::failing()),
        );

        service.handle_message(USER, "hi").await;
        assert!(service.has_session(USER).await);
    }
}
