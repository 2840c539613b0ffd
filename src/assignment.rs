//! Doctor assignment — picks an available doctor for a specialty.

use std::sync::Arc;

use crate::error::SheetError;
use crate::sheets::{Doctor, RosterStore};

/// Read-only resolver over the clinic roster.
pub struct AssignmentResolver {
    roster: Arc<dyn RosterStore>,
}

impl AssignmentResolver {
    pub fn new(roster: Arc<dyn RosterStore>) -> Self {
        Self { roster }
    }

    /// Find the preferred available doctor for `specialty`: active, exact
    /// specialty match, lowest priority value. Ties go to the earlier roster
    /// row. `None` when nobody matching is available.
    pub async fn resolve(&self, specialty: &str) -> Result<Option<Doctor>, SheetError> {
        let doctors = self.roster.doctors().await?;
        Ok(doctors
            .into_iter()
            .filter(|d| d.active && d.specialty == specialty)
            .min_by_key(|d| d.priority))
    }
}
