//! Session state — which step of the intake flow a participant is on, plus
//! the answers accumulated so far.

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// The steps of the intake conversation.
///
/// Progresses linearly: Start → MainMenu → AppointmentDate → AppointmentTime →
/// Privacy → Specialty → Procedure → PatientName → MedicalHistory → Terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start,
    MainMenu,
    AppointmentDate,
    AppointmentTime,
    Privacy,
    Specialty,
    Procedure,
    PatientName,
    MedicalHistory,
    Terms,
}

impl Default for Step {
    fn default() -> Self {
        Self::Start
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::MainMenu => "main_menu",
            Self::AppointmentDate => "appointment_date",
            Self::AppointmentTime => "appointment_time",
            Self::Privacy => "privacy",
            Self::Specialty => "specialty",
            Self::Procedure => "procedure",
            Self::PatientName => "patient_name",
            Self::MedicalHistory => "medical_history",
            Self::Terms => "terms",
        };
        write!(f, "{s}")
    }
}

/// Answers accumulated across steps.
///
/// Every field is optional here; a field is only written by the step that
/// produces it, and presence is checked once, at the submit boundary, by
/// [`IntakeDraft::finish`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeDraft {
    /// Chosen appointment date (set at the date step, consumed at the time step).
    pub appointment_date: Option<chrono::NaiveDate>,
    /// Combined "date time" string, e.g. `2026-08-06 09:00`.
    pub appointment: Option<String>,
    pub is_private: Option<bool>,
    /// Chosen specialties, in selection order.
    pub specialties: Vec<String>,
    /// Procedures offered by the chosen specialties, in specialty-selection
    /// order. Only used to index the procedure menu; rebuilt whenever
    /// `specialties` is set.
    pub available_procedures: Vec<String>,
    /// Chosen procedures, in selection order.
    pub procedures: Vec<String>,
    pub patient_name: Option<String>,
    pub medical_history: Option<String>,
}

/// A completed intake, ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub appointment: String,
    pub is_private: bool,
    pub specialties: Vec<String>,
    pub procedures: Vec<String>,
    pub patient_name: String,
    pub medical_history: String,
}

impl IntakeDraft {
    /// Validate that every required answer is present and produce the final
    /// [`Intake`]. Called when the participant accepts the terms.
    pub fn finish(self) -> Result<Intake, IntakeError> {
        let appointment = self
            .appointment
            .ok_or(IntakeError::MissingField("appointment"))?;
        let is_private = self
            .is_private
            .ok_or(IntakeError::MissingField("is_private"))?;
        if self.specialties.is_empty() {
            return Err(IntakeError::MissingField("specialties"));
        }
        if self.procedures.is_empty() {
            return Err(IntakeError::MissingField("procedures"));
        }
        let patient_name = self
            .patient_name
            .ok_or(IntakeError::MissingField("patient_name"))?;
        let medical_history = self
            .medical_history
            .ok_or(IntakeError::MissingField("medical_history"))?;

        Ok(Intake {
            appointment,
            is_private,
            specialties: self.specialties,
            procedures: self.procedures,
            patient_name,
            medical_history,
        })
    }
}

/// One participant's in-progress conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    pub draft: IntakeDraft,
}
