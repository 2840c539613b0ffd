//! Google Sheets backend — the roster and submission ledger live as two tabs
//! of one spreadsheet, accessed through the `values` API.
//!
//! Tab layout:
//! - `Doctors!A2:F` — id, name, address, specialty, active, priority
//! - `Submissions!A2:K` — the [`SubmissionRow`] fields in order, status in
//!   column K
//!
//! Malformed rows are skipped with a warning rather than failing the read.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::SheetError;
use crate::sheets::{Doctor, RosterStore, SubmissionRow, SubmissionStatus, SubmissionStore};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const ROSTER_RANGE: &str = "Doctors!A2:F";
const SUBMISSIONS_RANGE: &str = "Submissions!A2:K";
/// Sheet row holding the first submission (row 1 is the header).
const SUBMISSIONS_FIRST_ROW: usize = 2;
const STATUS_COLUMN: &str = "K";

/// Client for one spreadsheet, authenticated with a Bearer token.
pub struct GoogleSheets {
    spreadsheet_id: String,
    api_token: SecretString,
    client: reqwest::Client,
}

/// Response shape of `GET .../values/{range}`. `values` is absent entirely
/// when the range is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: String, api_token: SecretString) -> Self {
        Self {
            spreadsheet_id,
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!("{SHEETS_API_BASE}/{}/values/{range}", self.spreadsheet_id)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let resp = self
            .client
            .get(self.values_url(range))
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SheetError::Api {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let range: ValueRange = resp.json().await.map_err(|e| SheetError::Parse(e.to_string()))?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> Result<(), SheetError> {
        let url = format!("{}:append", self.values_url(range));
        let body = serde_json::json!({ "values": [row] });

        let resp = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(self.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SheetError::Api {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn update_cell(&self, cell: &str, value: &str) -> Result<(), SheetError> {
        let body = serde_json::json!({ "values": [[value]] });

        let resp = self
            .client
            .put(self.values_url(cell))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(self.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SheetError::Api {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RosterStore for GoogleSheets {
    async fn doctors(&self) -> Result<Vec<Doctor>, SheetError> {
        let rows = self.get_values(ROSTER_RANGE).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let doctor = doctor_from_row(row);
                if doctor.is_none() {
                    tracing::warn!(?row, "skipping malformed roster row");
                }
                doctor
            })
            .collect())
    }
}

#[async_trait]
impl SubmissionStore for GoogleSheets {
    async fn append(&self, row: &SubmissionRow) -> Result<(), SheetError> {
        self.append_row(SUBMISSIONS_RANGE, submission_to_cells(row)).await
    }

    async fn list(&self) -> Result<Vec<SubmissionRow>, SheetError> {
        let rows = self.get_values(SUBMISSIONS_RANGE).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let submission = submission_from_row(row);
                if submission.is_none() {
                    tracing::warn!(?row, "skipping malformed submission row");
                }
                submission
            })
            .collect())
    }

    async fn update_status(
        &self,
        index: usize,
        status: SubmissionStatus,
    ) -> Result<(), SheetError> {
        self.update_cell(&status_cell(index), &status.to_string()).await
    }
}

// ── Row conversions ─────────────────────────────────────────────────

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn parse_bool(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

/// A1 address of the status cell for the submission at list `index`.
fn status_cell(index: usize) -> String {
    format!("Submissions!{STATUS_COLUMN}{}", SUBMISSIONS_FIRST_ROW + index)
}

fn doctor_from_row(row: &[String]) -> Option<Doctor> {
    if row.len() < 6 {
        return None;
    }
    let priority = row[5].trim().parse().ok()?;
    Some(Doctor {
        id: row[0].clone(),
        name: row[1].clone(),
        address: row[2].clone(),
        specialty: row[3].clone(),
        active: parse_bool(&row[4]),
        priority,
    })
}

fn submission_from_row(row: &[String]) -> Option<SubmissionRow> {
    if row.len() < 11 {
        return None;
    }
    let status = row[10].trim().parse().ok()?;
    Some(SubmissionRow {
        id: row[0].clone(),
        requester: row[1].clone(),
        appointment: row[2].clone(),
        is_private: parse_bool(&row[3]),
        specialties: row[4].clone(),
        procedures: row[5].clone(),
        patient_name: row[6].clone(),
        medical_history: row[7].clone(),
        doctor_name: row[8].clone(),
        doctor_address: row[9].clone(),
        status,
    })
}

fn submission_to_cells(row: &SubmissionRow) -> Vec<String> {
    vec![
        row.id.clone(),
        row.requester.clone(),
        row.appointment.clone(),
        bool_cell(row.is_private),
        row.specialties.clone(),
        row.procedures.clone(),
        row.patient_name.clone(),
        row.medical_history.clone(),
        row.doctor_name.clone(),
        row.doctor_address.clone(),
        row.status.to_string(),
    ]
}
