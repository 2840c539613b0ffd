//! Tabular backend — the doctor roster and the submission ledger.
//!
//! Both live in a spreadsheet in production ([`google::GoogleSheets`]); the
//! traits here keep the core testable against [`memory::MemorySheets`].

pub mod google;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SheetError;

pub use google::GoogleSheets;
pub use memory::MemorySheets;

/// A doctor on the clinic roster. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    /// Channel address notifications are sent to.
    pub address: String,
    pub specialty: String,
    pub active: bool,
    /// Lower is preferred when several doctors match.
    pub priority: i64,
}

/// Lifecycle of a persisted submission.
///
/// `Assigned` rows move to `Accepted` or `Declined` when the doctor replies;
/// `Pending` rows had no available doctor and are handled out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Assigned,
    Accepted,
    Declined,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ASSIGNED" => Ok(Self::Assigned),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            other => Err(SheetError::Parse(format!("unknown status: {other}"))),
        }
    }
}

/// One persisted submission. List-valued answers are stored joined with
/// `", "` the way they appear in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub id: String,
    /// Address of the participant who filed the intake.
    pub requester: String,
    pub appointment: String,
    pub is_private: bool,
    pub specialties: String,
    pub procedures: String,
    pub patient_name: String,
    pub medical_history: String,
    /// Empty when no doctor was assigned.
    pub doctor_name: String,
    pub doctor_address: String,
    pub status: SubmissionStatus,
}

/// Read access to the doctor roster.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn doctors(&self) -> Result<Vec<Doctor>, SheetError>;
}

/// Append-only submission ledger with a single mutable cell per row: status.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Append one row. A single atomic operation; rows are never deleted.
    async fn append(&self, row: &SubmissionRow) -> Result<(), SheetError>;

    /// All rows, in sheet order. Row positions index `update_status`.
    async fn list(&self) -> Result<Vec<SubmissionRow>, SheetError>;

    /// Overwrite the status cell of the row at `index` (0-based list order).
    async fn update_status(&self, index: usize, status: SubmissionStatus)
    -> Result<(), SheetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_and_parse_roundtrip() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Assigned,
            SubmissionStatus::Accepted,
            SubmissionStatus::Declined,
        ] {
            let parsed: SubmissionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert!("assigned".parse::<SubmissionStatus>().is_err());
        assert!("".parse::<SubmissionStatus>().is_err());
    }
}
