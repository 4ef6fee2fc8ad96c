//! `appointments` rows
//!
//! `appointment_date` holds date and time together as a UTC timestamp. The
//! title lives in `doctor_name`. `status` is upcoming, completed or
//! cancelled; only completed counts as done.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{format_timestamp, parse_timestamp, RowError};
use crate::model::{non_empty, Appointment, AppointmentCategory, AppointmentPatch, NewAppointment};

const TABLE: &str = "appointments";

pub const DEFAULT_TITLE: &str = "Appointment";
pub const STATUS_UPCOMING: &str = "upcoming";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRow {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    pub appointment_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub appointment_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointmentRow {
    pub user_id: String,
    pub doctor_name: String,
    pub hospital: String,
    pub appointment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: &'static str,
    pub appointment_type: &'static str,
}

/// Columns touched by an update. `notes: Some(None)` writes null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<&'static str>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        *self == AppointmentChanges::default()
    }
}

pub fn scheduled_timestamp(date: NaiveDate, time: NaiveTime) -> String {
    format_timestamp(Utc.from_utc_datetime(&date.and_time(time)))
}

fn status(completed: bool) -> &'static str {
    if completed {
        STATUS_COMPLETED
    } else {
        STATUS_UPCOMING
    }
}

pub fn new_row(owner_id: &str, appointment: &NewAppointment) -> NewAppointmentRow {
    NewAppointmentRow {
        user_id: owner_id.to_string(),
        doctor_name: appointment.title.clone(),
        hospital: String::new(),
        appointment_date: scheduled_timestamp(appointment.date, appointment.time),
        notes: appointment.notes.clone(),
        status: status(appointment.completed),
        appointment_type: appointment.category.as_str(),
    }
}

/// Update columns for `patch` applied to `current`. Changing only the date or
/// only the time still rewrites the whole timestamp.
pub fn changes(current: &Appointment, patch: &AppointmentPatch) -> AppointmentChanges {
    let appointment_date = if patch.touches_schedule() {
        Some(scheduled_timestamp(
            patch.date.unwrap_or(current.date),
            patch.time.unwrap_or(current.time),
        ))
    } else {
        None
    };

    AppointmentChanges {
        doctor_name: patch.title.as_ref().map(|title| title.trim().to_string()),
        appointment_date,
        notes: patch.notes.as_deref().map(non_empty),
        status: patch.completed.map(status),
        appointment_type: patch.category.map(|category| category.as_str()),
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RowError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let scheduled = parse_timestamp(&row.appointment_date).ok_or_else(|| {
            RowError::new(
                TABLE,
                &row.id,
                format!("unreadable appointment_date {:?}", row.appointment_date),
            )
        })?;

        let category = row
            .appointment_type
            .as_deref()
            .and_then(AppointmentCategory::parse)
            .unwrap_or_default();

        Ok(Appointment {
            title: row
                .doctor_name
                .as_deref()
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: scheduled.date_naive(),
            time: scheduled.time(),
            category,
            notes: row.notes.as_deref().and_then(non_empty),
            completed: row.status.as_deref() == Some(STATUS_COMPLETED),
            id: row.id,
            owner_id: row.user_id,
        })
    }
}
