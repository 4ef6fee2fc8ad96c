//! Ordering queries over the current snapshot

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Appointment, SymptomEntry};

/// Entries logged no earlier than `days` before `now`, newest first
pub fn recent_symptoms(entries: &[SymptomEntry], now: DateTime<Utc>, days: i64) -> Vec<&SymptomEntry> {
    let since = super::window_start(now, super::days_window(days));
    let mut recent: Vec<&SymptomEntry> = entries
        .iter()
        .filter(|entry| entry.logged_at >= since)
        .collect();
    recent.sort_by(|a, b| {
        b.logged_at
            .cmp(&a.logged_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    recent
}

/// Open appointments from `today` on, soonest first
pub fn upcoming_appointments(appointments: &[Appointment], today: NaiveDate) -> Vec<&Appointment> {
    let mut upcoming: Vec<&Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date >= today && !appointment.completed)
        .collect();
    upcoming.sort_by(|a, b| {
        a.scheduled_at()
            .cmp(&b.scheduled_at())
            .then_with(|| a.id.cmp(&b.id))
    });
    upcoming
}

/// Appointments before `today` or already completed, latest first
pub fn past_appointments(appointments: &[Appointment], today: NaiveDate) -> Vec<&Appointment> {
    let mut past: Vec<&Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date < today || appointment.completed)
        .collect();
    past.sort_by(|a, b| {
        b.scheduled_at()
            .cmp(&a.scheduled_at())
            .then_with(|| a.id.cmp(&b.id))
    });
    past
}
