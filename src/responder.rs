//! Doctor reply handling — interprets "1"/"2" from a doctor with an
//! outstanding assigned submission as accept/decline.
//!
//! Tried before ordinary session routing on every inbound turn, so a clinic
//! user typing "1" mid-flow is only affected if their number also happens to
//! be a doctor's with an assigned case.

use std::sync::Arc;

use crate::channels::Messenger;
use crate::error::SheetError;
use crate::session::prompts;
use crate::sheets::{SubmissionStatus, SubmissionStore};

pub struct DoctorReplyHandler {
    submissions: Arc<dyn SubmissionStore>,
    messenger: Arc<dyn Messenger>,
}

impl DoctorReplyHandler {
    pub fn new(submissions: Arc<dyn SubmissionStore>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            submissions,
            messenger,
        }
    }

    /// Try to interpret `text` from `from` as a doctor's accept/decline.
    ///
    /// Returns `true` when the turn was consumed here and session routing
    /// must be skipped. Returns `false` when `text` is not "1"/"2" or `from`
    /// has no assigned submission. The status update is attempted exactly
    /// once; a failed update is logged and the turn still counts as handled.
    pub async fn try_handle(&self, from: &str, text: &str) -> Result<bool, SheetError> {
        let accepted = match text.trim() {
            "1" => true,
            "2" => false,
            _ => return Ok(false),
        };

        let rows = self.submissions.list().await?;
        let Some(index) = rows
            .iter()
            .position(|r| r.doctor_address == from && r.status == SubmissionStatus::Assigned)
        else {
            return Ok(false);
        };

        let status = if accepted {
            SubmissionStatus::Accepted
        } else {
            SubmissionStatus::Declined
        };

        match self.submissions.update_status(index, status).await {
            Ok(()) => {
                tracing::info!(id = %rows[index].id, %status, "doctor replied");
                if let Err(e) = self
                    .messenger
                    .send_text(from, &prompts::doctor_ack(accepted))
                    .await
                {
                    tracing::warn!(error = %e, "doctor acknowledgment failed");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, id = %rows[index].id, "failed to update submission status");
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::testing::RecordingMessenger;
    use crate::sheets::{MemorySheets, SubmissionRow};

    fn row(id: &str, doctor_address: &str, status: SubmissionStatus) -> SubmissionRow {
        SubmissionRow {
            id: id.into(),
            requester: "15550001111".into(),
            appointment: "2026-08-07 09:00".into(),
            is_private: false,
            specialties: "Orthodontics".into(),
            procedures: "Consultation".into(),
            patient_name: "Jane Doe".into(),
            medical_history: "None".into(),
            doctor_name: "Dr. Osei".into(),
            doctor_address: doctor_address.into(),
            status,
        }
    }

    async fn handler_with_rows(
        rows: Vec<SubmissionRow>,
    ) -> (DoctorReplyHandler, Arc<MemorySheets>, Arc<RecordingMessenger>) {
        let sheets = Arc::new(MemorySheets::new());
        for r in &rows {
            sheets.append(r).await.unwrap();
        }
        let messenger = Arc::new(RecordingMessenger::new());
        let handler = DoctorReplyHandler::new(sheets.clone(), messenger.clone());
        (handler, sheets, messenger)
    }

    #[tokio::test]
    async fn one_from_assigned_doctor_accepts() {
        let (handler, sheets, messenger) =
            handler_with_rows(vec![row("a", "15557770000", SubmissionStatus::Assigned)]).await;

        assert!(handler.try_handle("15557770000", "1").await.unwrap());
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Accepted
        );
        let sent = messenger.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "15557770000");
        assert!(sent[0].1.contains("accepted"));
    }

    #[tokio::test]
    async fn two_from_assigned_doctor_declines() {
        let (handler, sheets, _) =
            handler_with_rows(vec![row("a", "15557770000", SubmissionStatus::Assigned)]).await;

        assert!(handler.try_handle("15557770000", "2").await.unwrap());
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Declined
        );
    }

    #[tokio::test]
    async fn other_text_is_never_handled() {
        let (handler, _, _) =
            handler_with_rows(vec![row("a", "15557770000", SubmissionStatus::Assigned)]).await;

        assert!(!handler.try_handle("15557770000", "yes").await.unwrap());
        assert!(!handler.try_handle("15557770000", "12").await.unwrap());
        assert!(!handler.try_handle("15557770000", "").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_sender_is_not_handled() {
        let (handler, sheets, _) =
            handler_with_rows(vec![row("a", "15557770000", SubmissionStatus::Assigned)]).await;

        assert!(!handler.try_handle("15559999999", "1").await.unwrap());
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Assigned
        );
    }

    #[tokio::test]
    async fn only_assigned_rows_qualify() {
        let (handler, _, _) = handler_with_rows(vec![
            row("a", "15557770000", SubmissionStatus::Accepted),
            row("b", "15557770000", SubmissionStatus::Pending),
        ])
        .await;

        assert!(!handler.try_handle("15557770000", "1").await.unwrap());
    }

    #[tokio::test]
    async fn first_assigned_row_wins() {
        let (handler, sheets, _) = handler_with_rows(vec![
            row("a", "15557770000", SubmissionStatus::Assigned),
            row("b", "15557770000", SubmissionStatus::Assigned),
        ])
        .await;

        assert!(handler.try_handle("15557770000", "1").await.unwrap());
        let rows = sheets.submissions().await;
        assert_eq!(rows[0].status, SubmissionStatus::Accepted);
        assert_eq!(rows[1].status, SubmissionStatus::Assigned);
    }

    #[tokio::test]
    async fn ack_failure_still_counts_as_handled() {
        let sheets = Arc::new(MemorySheets::new());
        sheets
            .append(&row("a", "15557770000", SubmissionStatus::Assigned))
            .await
            .unwrap();
        let handler =
            DoctorReplyHandler::new(sheets.clone(), Arc::new(RecordingMessenger::failing()));

        assert!(handler.try_handle("15557770000", "1").await.unwrap());
        assert_eq!(
            sheets.submissions().await[0].status,
            SubmissionStatus::Accepted
        );
    }
}
