//! Reply-text builders for every step of the intake conversation.
//!
//! These are pure functions of the data they present, so transition logic can
//! be tested without string-matching against hardcoded copy.

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::sheets::SubmissionRow;

const CLINIC_NAME: &str = "BrightSmile Dental";

pub fn main_menu() -> String {
    format!(
        "Welcome to {CLINIC_NAME}! 🦷\n\n\
         1. Book an appointment\n\n\
         Reply with the number of your choice. You can send CANCEL at any \
         time to stop."
    )
}

pub fn session_closed() -> String {
    format!("Thanks for contacting {CLINIC_NAME}. Send any message if you need us again.")
}

pub fn date_menu(dates: &[NaiveDate; 3]) -> String {
    format!(
        "When would you like to come in?\n\n\
         1. Today ({})\n\
         2. Tomorrow ({})\n\
         3. {}\n\n\
         Reply 1, 2 or 3.",
        dates[0], dates[1], dates[2]
    )
}

pub fn invalid_date() -> String {
    "Sorry, that's not one of the offered days. Please reply 1, 2 or 3.".to_string()
}

pub fn time_menu(slots: &[&str]) -> String {
    let mut lines = vec!["What time suits you?".to_string(), String::new()];
    for (i, slot) in slots.iter().enumerate() {
        lines.push(format!("{}. {slot}", i + 1));
    }
    lines.push(String::new());
    lines.push(format!("Reply with a number from 1 to {}.", slots.len()));
    lines.join("\n")
}

pub fn invalid_time() -> String {
    "Sorry, that's not one of the offered time slots. Please pick a number from the list."
        .to_string()
}

pub fn privacy_prompt() -> String {
    "Would you like a private consultation room?\n\n\
     1. Yes, private\n\
     2. No, a regular room is fine"
        .to_string()
}

pub fn specialty_menu(catalog: &Catalog) -> String {
    let mut lines = vec![
        "Which specialty do you need?".to_string(),
        String::new(),
    ];
    for (i, name) in catalog.specialties().enumerate() {
        lines.push(format!("{}. {name}", i + 1));
    }
    lines.push(String::new());
    lines.push("Reply with one or more numbers, separated by commas (e.g. 1,3).".to_string());
    lines.join("\n")
}

pub fn procedure_menu(available: &[String]) -> String {
    let mut lines = vec![
        "Which procedures would you like to book?".to_string(),
        String::new(),
    ];
    for (i, name) in available.iter().enumerate() {
        lines.push(format!("{}. {name}", i + 1));
    }
    lines.push(String::new());
    lines.push("Reply with one or more numbers, separated by commas.".to_string());
    lines.join("\n")
}

pub fn invalid_selection() -> String {
    "Sorry, I didn't recognise any of those numbers. Please reply with numbers \
     from the list, separated by commas."
        .to_string()
}

pub fn patient_prompt() -> String {
    "What is the patient's full name?".to_string()
}

pub fn patient_reprompt() -> String {
    "Please send the patient's full name.".to_string()
}

pub fn medical_prompt() -> String {
    "Any relevant medical history we should know about (allergies, medication, \
     ongoing conditions)?\n\nReply 0 if there is none."
        .to_string()
}

pub fn terms_notice() -> String {
    format!(
        "Almost done! Please note:\n\n\
         • Arrive 10 minutes before your appointment.\n\
         • Cancellations less than 24 hours in advance may incur a fee.\n\
         • {CLINIC_NAME} will contact you on this number about your booking.\n\n\
         1. Accept and submit\n\
         2. Cancel"
    )
}

pub fn cancelled() -> String {
    "Your request has been cancelled. Send any message to start again.".to_string()
}

pub fn restart_hint() -> String {
    "Sorry, something went wrong with this conversation. Type HI to start again.".to_string()
}

pub fn confirmation(row: &SubmissionRow) -> String {
    format!(
        "✅ Your appointment request has been submitted!\n\n\
         Reference: {}\n\
         Appointment: {}\n\
         Specialty: {}\n\
         Procedures: {}\n\
         Patient: {}\n\n\
         We'll be in touch to confirm. Thank you for choosing {CLINIC_NAME}!",
        row.id, row.appointment, row.specialties, row.procedures, row.patient_name
    )
}

pub fn submission_failed() -> String {
    "Sorry, we couldn't save your request right now. Please try again in a few \
     minutes, or call the clinic directly."
        .to_string()
}

pub fn doctor_notification(row: &SubmissionRow) -> String {
    let privacy = if row.is_private { "Yes" } else { "No" };
    format!(
        "🩺 New appointment request\n\n\
         Patient: {}\n\
         When: {}\n\
         Specialty: {}\n\
         Procedures: {}\n\
         Private room: {privacy}\n\
         Medical history: {}\n\n\
         Reply 1 to accept or 2 to decline.",
        row.patient_name, row.appointment, row.specialties, row.procedures, row.medical_history
    )
}

pub fn doctor_ack(accepted: bool) -> String {
    if accepted {
        "You've accepted this appointment. The clinic schedule has been updated.".to_string()
    } else {
        "You've declined this appointment. The clinic will reassign it.".to_string()
    }
}
