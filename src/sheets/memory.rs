//! In-memory roster and submission store, for tests and offline runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::SheetError;
use crate::sheets::{Doctor, RosterStore, SubmissionRow, SubmissionStatus, SubmissionStore};

#[derive(Default)]
pub struct MemorySheets {
    doctors: RwLock<Vec<Doctor>>,
    submissions: RwLock<Vec<SubmissionRow>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors: RwLock::new(doctors),
            submissions: RwLock::new(Vec::new()),
        }
    }

    pub async fn add_doctor(&self, doctor: Doctor) {
        self.doctors.write().await.push(doctor);
    }

    /// Snapshot of the submission ledger.
    pub async fn submissions(&self) -> Vec<SubmissionRow> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl RosterStore for MemorySheets {
    async fn doctors(&self) -> Result<Vec<Doctor>, SheetError> {
        Ok(self.doctors.read().await.clone())
    }
}

#[async_trait]
impl SubmissionStore for MemorySheets {
    async fn append(&self, row: &SubmissionRow) -> Result<(), SheetError> {
        self.submissions.write().await.push(row.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SubmissionRow>, SheetError> {
        Ok(self.submissions.read().await.clone())
    }

    async fn update_status(
        &self,
        index: usize,
        status: SubmissionStatus,
    ) -> Result<(), SheetError> {
        let mut rows = self.submissions.write().await;
        let row = rows
            .get_mut(index)
            .ok_or(SheetError::RowOutOfRange { index })?;
        row.status = status;
        Ok(())
    }
}
