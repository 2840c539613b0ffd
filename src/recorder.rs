//! Submission recorder — turns a completed intake into a persisted row and
//! notifies the assigned doctor.

use std::sync::Arc;

use uuid::Uuid;

use crate::assignment::AssignmentResolver;
use crate::channels::Messenger;
use crate::error::SheetError;
use crate::session::Intake;
use crate::session::prompts;
use crate::sheets::{SubmissionRow, SubmissionStatus, SubmissionStore};

pub struct SubmissionRecorder {
    submissions: Arc<dyn SubmissionStore>,
    resolver: AssignmentResolver,
    messenger: Arc<dyn Messenger>,
}

impl SubmissionRecorder {
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        resolver: AssignmentResolver,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            submissions,
            resolver,
            messenger,
        }
    }

    /// Persist `intake` as a new submission row and return it.
    ///
    /// Assignment uses the first chosen specialty only. A roster failure
    /// downgrades the row to `Pending` rather than failing the submission;
    /// the doctor notification is best-effort. Only the row append itself can
    /// fail this call.
    pub async fn record(&self, intake: Intake, requester: &str) -> Result<SubmissionRow, SheetError> {
        let doctor = match intake.specialties.first() {
            Some(specialty) => match self.resolver.resolve(specialty).await {
                Ok(doctor) => doctor,
                Err(e) => {
                    tracing::warn!(error = %e, %specialty, "roster lookup failed; recording as pending");
                    None
                }
            },
            None => None,
        };

        let row = SubmissionRow {
            id: Uuid::new_v4().to_string(),
            requester: requester.to_string(),
            appointment: intake.appointment,
            is_private: intake.is_private,
            specialties: intake.specialties.join(", "),
            procedures: intake.procedures.join(", "),
            patient_name: intake.patient_name,
            medical_history: intake.medical_history,
            doctor_name: doctor.as_ref().map(|d| d.name.clone()).unwrap_or_default(),
            doctor_address: doctor
                .as_ref()
                .map(|d| d.address.clone())
                .unwrap_or_default(),
            status: if doctor.is_some() {
                SubmissionStatus::Assigned
            } else {
                SubmissionStatus::Pending
            },
        };

        self.submissions.append(&row).await?;
        tracing::info!(id = %row.id, status = %row.status, "submission recorded");

        if let Some(doctor) = doctor {
            if let Err(e) = self
                .messenger
                .send_text(&doctor.address, &prompts::doctor_notification(&row))
                .await
            {
                tracing::warn!(error = %e, doctor = %doctor.name, "doctor notification failed");
            }
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::testing::RecordingMessenger;
    use crate::sheets::{Doctor, MemorySheets};

    fn intake(specialties: &[&str]) -> Intake {
        Intake {
            appointment: "2026-08-07 09:00".into(),
            is_private: false,
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            procedures: vec!["Consultation".into()],
            patient_name: "Jane Doe".into(),
            medical_history: "None".into(),
        }
    }

    fn doctor(id: &str, specialty: &str, priority: i64) -> Doctor {
        Doctor {
            id: id.into(),
            name: format!("Dr. {id}"),
            address: format!("1555{id}"),
            specialty: specialty.into(),
            active: true,
            priority,
        }
    }

    fn recorder(
        sheets: Arc<MemorySheets>,
        messenger: Arc<RecordingMessenger>,
    ) -> SubmissionRecorder {
        SubmissionRecorder::new(
            sheets.clone(),
            AssignmentResolver::new(sheets),
            messenger,
        )
    }

    #[tokio::test]
    async fn assigned_when_a_doctor_matches() {
        let sheets = Arc::new(MemorySheets::with_doctors(vec![doctor(
            "a",
            "Orthodontics",
            1,
        )]));
        let messenger = Arc::new(RecordingMessenger::new());
        let recorder = recorder(sheets.clone(), messenger.clone());

        let row = recorder
            .record(intake(&["Orthodontics"]), "15550001111")
            .await
            .unwrap();

        assert_eq!(row.status, SubmissionStatus::Assigned);
        assert_eq!(row.doctor_name, "Dr. a");
        assert_eq!(row.doctor_address, "1555a");

        // Persisted and notified
        assert_eq!(sheets.submissions().await.len(), 1);
        let sent = messenger.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "1555a");
        assert!(sent[0].1.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn pending_when_no_doctor_matches() {
        let sheets = Arc::new(MemorySheets::new());
        let messenger = Arc::new(RecordingMessenger::new());
        let recorder = recorder(sheets.clone(), messenger.clone());

        let row = recorder
            .record(intake(&["Orthodontics"]), "15550001111")
            .await
            .unwrap();

        assert_eq!(row.status, SubmissionStatus::Pending);
        assert!(row.doctor_name.is_empty());
        assert!(row.doctor_address.is_empty());
        assert!(messenger.sent().await.is_empty());
    }

    #[tokio::test]
    async fn assignment_uses_first_specialty_only() {
        let sheets = Arc::new(MemorySheets::with_doctors(vec![doctor(
            "surgeon",
            "Oral Surgery",
            1,
        )]));
        let messenger = Arc::new(RecordingMessenger::new());
        let recorder = recorder(sheets.clone(), messenger.clone());

        // First specialty has no doctor; the second does, but is not consulted.
        let row = recorder
            .record(intake(&["Orthodontics", "Oral Surgery"]), "15550001111")
            .await
            .unwrap();

        assert_eq!(row.status, SubmissionStatus::Pending);
        assert!(messenger.sent().await.is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_submission() {
        let sheets = Arc::new(MemorySheets::with_doctors(vec![doctor(
            "a",
            "Orthodontics",
            1,
        )]));
        let messenger = Arc::new(RecordingMessenger::failing());
        let recorder = recorder(sheets.clone(), messenger);

        let row = recorder
            .record(intake(&["Orthodontics"]), "15550001111")
            .await
            .unwrap();

        assert_eq!(row.status, SubmissionStatus::Assigned);
        assert_eq!(sheets.submissions().await.len(), 1);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let sheets = Arc::new(MemorySheets::new());
        let messenger = Arc::new(RecordingMessenger::new());
        let recorder = recorder(sheets.clone(), messenger);

        let a = recorder
            .record(intake(&["Orthodontics"]), "x")
            .await
            .unwrap();
        let b = recorder
            .record(intake(&["Orthodontics"]), "x")
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
