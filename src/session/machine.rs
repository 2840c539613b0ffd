//! The intake state machine — advances one session by one inbound message.
//!
//! Pure transition logic: no I/O happens here. The dispatcher owns session
//! persistence and side effects; reply text comes from [`prompts`].

use chrono::{Duration, NaiveDate};

use crate::catalog::Catalog;
use crate::session::prompts;
use crate::session::state::{Intake, Session, Step};

/// Canonical time slots offered at the time step.
pub const TIME_SLOTS: [&str; 4] = ["09:00", "11:00", "14:00", "16:00"];

/// Result of advancing a session by one inbound message.
#[derive(Debug)]
pub enum Outcome {
    /// Keep (and persist) the updated session, send the reply.
    Continue { session: Session, reply: String },
    /// Drop the session, send the reply.
    Close { reply: String },
    /// Terms accepted with a complete draft; record the intake.
    Submit { intake: Intake },
}

/// The three dates offered at the date step: today, tomorrow, the day after.
pub fn offered_dates(today: NaiveDate) -> [NaiveDate; 3] {
    [today, today + Duration::days(1), today + Duration::days(2)]
}

/// Parse a comma-separated list of 1-based menu indices.
///
/// Tokens are trimmed; tokens that fail to parse or fall outside `1..=max`
/// are dropped. Input order and duplicates are preserved.
pub fn parse_selection(input: &str, max: usize) -> Vec<usize> {
    input
        .split(',')
        .filter_map(|tok| tok.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= max)
        .collect()
}

/// Advance `session` with one inbound message, producing the reply and the
/// session's fate for this turn.
///
/// Invalid input at a menu step re-prompts without touching the step or the
/// draft.
pub fn advance(mut session: Session, input: &str, catalog: &Catalog, today: NaiveDate) -> Outcome {
    let input = input.trim();

    match session.step {
        Step::Start => {
            session.step = Step::MainMenu;
            Outcome::Continue {
                reply: prompts::main_menu(),
                session,
            }
        }

        Step::MainMenu => {
            if input == "1" {
                session.step = Step::AppointmentDate;
                Outcome::Continue {
                    reply: prompts::date_menu(&offered_dates(today)),
                    session,
                }
            } else {
                Outcome::Close {
                    reply: prompts::session_closed(),
                }
            }
        }

        Step::AppointmentDate => {
            let offset = match input {
                "1" => 0,
                "2" => 1,
                "3" => 2,
                _ => {
                    return Outcome::Continue {
                        reply: prompts::invalid_date(),
                        session,
                    };
                }
            };
            session.draft.appointment_date = Some(today + Duration::days(offset));
            session.step = Step::AppointmentTime;
            Outcome::Continue {
                reply: prompts::time_menu(&TIME_SLOTS),
                session,
            }
        }

        Step::AppointmentTime => {
            let slot = match input.parse::<usize>() {
                Ok(n) if (1..=TIME_SLOTS.len()).contains(&n) => TIME_SLOTS[n - 1],
                _ => {
                    return Outcome::Continue {
                        reply: prompts::invalid_time(),
                        session,
                    };
                }
            };
            let Some(date) = session.draft.appointment_date else {
                // Reachable only if the session was corrupted; start over.
                tracing::warn!("time step reached without a stored date; resetting session");
                return Outcome::Close {
                    reply: prompts::restart_hint(),
                };
            };
            session.draft.appointment = Some(format!("{date} {slot}"));
            session.step = Step::Privacy;
            Outcome::Continue {
                reply: prompts::privacy_prompt(),
                session,
            }
        }

        Step::Privacy => {
            // "1" means private; anything else (including nothing) is public.
            session.draft.is_private = Some(input == "1");
            session.step = Step::Specialty;
            Outcome::Continue {
                reply: prompts::specialty_menu(catalog),
                session,
            }
        }

        Step::Specialty => {
            let picks = parse_selection(input, catalog.len());
            if picks.is_empty() {
                return Outcome::Continue {
                    reply: prompts::invalid_selection(),
                    session,
                };
            }
            let specialties: Vec<String> = picks
                .iter()
                .filter_map(|&i| catalog.specialty_at(i))
                .map(String::from)
                .collect();
            // Offered procedures follow specialty-selection order, duplicates
            // and all; any earlier procedure picks no longer index this list.
            let available: Vec<String> = specialties
                .iter()
                .filter_map(|s| catalog.procedures_for(s))
                .flat_map(|procs| procs.iter().cloned())
                .collect();
            session.draft.specialties = specialties;
            session.draft.available_procedures = available;
            session.draft.procedures.clear();
            session.step = Step::Procedure;
            let reply = prompts::procedure_menu(&session.draft.available_procedures);
            Outcome::Continue { reply, session }
        }

        Step::Procedure => {
            let picks = parse_selection(input, session.draft.available_procedures.len());
            if picks.is_empty() {
                return Outcome::Continue {
                    reply: prompts::invalid_selection(),
                    session,
                };
            }
            session.draft.procedures = picks
                .iter()
                .map(|&i| session.draft.available_procedures[i - 1].clone())
                .collect();
            session.step = Step::PatientName;
            Outcome::Continue {
                reply: prompts::patient_prompt(),
                session,
            }
        }

        Step::PatientName => {
            if input.is_empty() {
                return Outcome::Continue {
                    reply: prompts::patient_reprompt(),
                    session,
                };
            }
            session.draft.patient_name = Some(input.to_string());
            session.step = Step::MedicalHistory;
            Outcome::Continue {
                reply: prompts::medical_prompt(),
                session,
            }
        }

        Step::MedicalHistory => {
            let history = if input == "0" {
                "None".to_string()
            } else {
                input.to_string()
            };
            session.draft.medical_history = Some(history);
            session.step = Step::Terms;
            Outcome::Continue {
                reply: prompts::terms_notice(),
                session,
            }
        }

        Step::Terms => {
            if input == "1" {
                match session.draft.finish() {
                    Ok(intake) => Outcome::Submit { intake },
                    Err(e) => {
                        tracing::warn!(error = %e, "incomplete intake at submit; resetting session");
                        Outcome::Close {
                            reply: prompts::restart_hint(),
                        }
                    }
                }
            } else {
                Outcome::Close {
                    reply: prompts::cancelled(),
                }
            }
        }
    }
}
