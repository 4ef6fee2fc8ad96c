//! Appointments

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::symptom::non_empty;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentCategory {
    /// Also what rows without a stored category decode to
    #[default]
    Checkup,
    Ultrasound,
    BloodTest,
    Consultation,
    Other,
}

impl AppointmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentCategory::Checkup => "checkup",
            AppointmentCategory::Ultrasound => "ultrasound",
            AppointmentCategory::BloodTest => "blood-test",
            AppointmentCategory::Consultation => "consultation",
            AppointmentCategory::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "checkup" => Some(AppointmentCategory::Checkup),
            "ultrasound" => Some(AppointmentCategory::Ultrasound),
            "blood-test" | "blood_test" => Some(AppointmentCategory::BloodTest),
            "consultation" => Some(AppointmentCategory::Consultation),
            "other" => Some(AppointmentCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: AppointmentCategory,
    pub notes: Option<String>,
    pub completed: bool,
}

impl Appointment {
    /// Date and time combined; the sort key for upcoming/past queries
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Raw scheduling form input; date is `YYYY-MM-DD`, time is `HH:MM`
#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    pub title: String,
    pub date: String,
    pub time: String,
    pub category: AppointmentCategory,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: AppointmentCategory,
    pub notes: Option<String>,
    pub completed: bool,
}

impl NewAppointment {
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl AppointmentForm {
    pub fn validate(&self) -> Result<NewAppointment, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() || self.date.trim().is_empty() || self.time.trim().is_empty() {
            return Err(ValidationError::new(
                "Please fill in all fields",
                "We need the details to schedule your appointment",
            ));
        }

        Ok(NewAppointment {
            title: title.to_string(),
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            category: self.category,
            notes: non_empty(&self.notes),
            completed: false,
        })
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new("Please check the date", format!("\"{}\" is not a date", raw))
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`
pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, "%H:%M:%S"))
        .map_err(|_| {
            ValidationError::new("Please check the time", format!("\"{}\" is not a time", raw))
        })
}

/// Partial appointment update; `None` leaves a field alone.
/// An empty `notes` string clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub category: Option<AppointmentCategory>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

impl AppointmentPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == AppointmentPatch::default()
    }

    pub fn touches_schedule(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::new(
                    "Please fill in all fields",
                    "An appointment needs a title",
                ));
            }
        }
        Ok(())
    }
}
